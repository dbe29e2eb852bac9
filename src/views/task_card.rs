use crate::dates;
use crate::models::Task;
use time::OffsetDateTime;

const NOT_SET: &str = "Not set";

/// Card shown for one task in list views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub start_date: String,
    pub due_date: String,
    pub author: String,
    pub assignee: String,
}

impl From<&Task> for TaskCard {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().filter(|d| !d.is_empty()),
            priority: task.priority.clone(),
            status: task.status.clone(),
            tags: task.tag_list().into_iter().map(str::to_string).collect(),
            start_date: display_date(task.start_date),
            due_date: display_date(task.due_date),
            author: author_name(task),
            assignee: assignee_name(task),
        }
    }
}

/// Row of the task tables (priority page table mode, dashboard recent tasks)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub tags: String,
    pub start_date: String,
    pub due_date: String,
    pub author: String,
    pub assignee: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.clone().unwrap_or_default(),
            priority: task.priority.clone().unwrap_or_default(),
            tags: task.tags.clone().unwrap_or_default(),
            start_date: task.start_date.map(dates::to_timestamp).unwrap_or_default(),
            due_date: task.due_date.map(dates::to_timestamp).unwrap_or_default(),
            author: author_name(task),
            assignee: assignee_name(task),
        }
    }
}

fn display_date(value: Option<OffsetDateTime>) -> String {
    value
        .map(dates::to_display)
        .unwrap_or_else(|| NOT_SET.to_string())
}

fn author_name(task: &Task) -> String {
    task.author
        .as_ref()
        .map(|user| user.username.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn assignee_name(task: &Task) -> String {
    task.assignee
        .as_ref()
        .map(|user| user.username.clone())
        .unwrap_or_else(|| "Unassigned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(value: serde_json::Value) -> Task {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_card_fallbacks() {
        let card = TaskCard::from(&task(json!({
            "id": 4,
            "title": "Fix login",
            "description": "",
            "projectId": 1,
            "authorUserId": 1
        })));

        assert_eq!(card.description, None);
        assert!(card.tags.is_empty());
        assert_eq!(card.start_date, "Not set");
        assert_eq!(card.due_date, "Not set");
        assert_eq!(card.author, "Unknown");
        assert_eq!(card.assignee, "Unassigned");
    }

    #[test]
    fn test_card_fields() {
        let card = TaskCard::from(&task(json!({
            "id": 4,
            "title": "Fix login",
            "priority": "Urgent",
            "status": "To Do",
            "tags": "auth, bug",
            "startDate": "2024-03-01T00:00:00Z",
            "dueDate": "2024-03-15T12:00:00Z",
            "projectId": 1,
            "authorUserId": 1,
            "author": {"userId": 1, "username": "ana", "email": "ana@example.com"},
            "assignee": {"userId": 2, "username": "bo", "email": "bo@example.com"}
        })));

        assert_eq!(card.tags, vec!["auth", "bug"]);
        assert_eq!(card.start_date, "Mar 01, 2024");
        assert_eq!(card.due_date, "Mar 15, 2024");
        assert_eq!(card.author, "ana");
        assert_eq!(card.assignee, "bo");
    }

    #[test]
    fn test_row_uses_full_timestamps() {
        let row = TaskRow::from(&task(json!({
            "id": 4,
            "title": "Fix login",
            "dueDate": "2024-03-15T12:00:00Z",
            "projectId": 1,
            "authorUserId": 1
        })));

        assert_eq!(row.due_date, "2024-03-15T12:00:00Z");
        assert_eq!(row.start_date, "");
        assert_eq!(row.assignee, "Unassigned");
    }
}
