use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::handlers::common::{coerce_date, coerce_int, present};
use crate::middlewares::AuthUser;
use crate::models::{CreateTask, Priority, Status, StatusUpdate, Task};
use crate::repositories::TaskRepository;
use crate::state::AppState;

// ============ Request DTOs ============

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskListParams {
    pub project_id: i32,
}

/// Task creation body. Ids and points may arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub points: Option<Value>,
    #[schema(value_type = i32)]
    pub project_id: Option<Value>,
    #[schema(value_type = i32)]
    pub author_user_id: Option<Value>,
    #[schema(value_type = Option<i32>)]
    pub assigned_user_id: Option<Value>,
}

impl CreateTaskRequest {
    /// Presence checks, coercion and defaults; nothing here touches the store
    pub fn into_create_task(self) -> AppResult<CreateTask> {
        let title = present(self.title);
        let project_id = coerce_int("projectId", self.project_id.as_ref())?;
        let author_user_id = coerce_int("authorUserId", self.author_user_id.as_ref())?;

        let (Some(title), Some(project_id), Some(author_user_id)) =
            (title, project_id, author_user_id)
        else {
            return Err(AppError::Validation(
                "Missing required fields: title, projectId, and authorUserId are required"
                    .to_string(),
            ));
        };

        Ok(CreateTask {
            title,
            description: present(self.description),
            status: present(self.status).unwrap_or_else(|| Status::default().to_string()),
            priority: present(self.priority).unwrap_or_else(|| Priority::default().to_string()),
            tags: present(self.tags),
            start_date: coerce_date("startDate", self.start_date)?,
            due_date: coerce_date("dueDate", self.due_date)?,
            points: coerce_int("points", self.points.as_ref())?,
            project_id,
            author_user_id,
            assigned_user_id: coerce_int("assignedUserId", self.assigned_user_id.as_ref())?,
        })
    }
}

// ============ Handlers ============

/// List the tasks of a project
#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskListParams),
    responses(
        (status = 200, description = "Tasks with author, assignee, comments and attachments", body = [Task]),
        (status = 400, description = "Missing or invalid projectId"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = TaskRepository::list_by_project(&state.db, params.project_id).await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let create_task = payload.into_create_task()?;
    tracing::debug!(?create_task, "Creating task");

    let task = TaskRepository::create(&state.db, &create_task).await?;
    tracing::info!(
        task_id = task.id,
        project_id = task.project_id,
        subject = %user.subject,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Overwrite the status of a task
#[utoipa::path(
    patch,
    path = "/tasks/{taskId}/status",
    params(
        ("taskId" = i32, Path, description = "Task ID")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Task>> {
    // Values outside the Status set are stored as sent
    let task = TaskRepository::update_status(&state.db, task_id, &payload.status).await?;
    Ok(Json(task))
}

/// Tasks a user authored or is assigned to
#[utoipa::path(
    get,
    path = "/tasks/user/{userId}",
    params(
        ("userId" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Tasks with author and assignee", body = [Task]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn get_user_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = TaskRepository::list_by_user(&state.db, user_id).await?;
    Ok(Json(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateTaskRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let task = request(json!({"title": "Ship", "projectId": 1, "authorUserId": 2}))
            .into_create_task()
            .unwrap();

        assert_eq!(task.status, "To Do");
        assert_eq!(task.priority, "Medium");
        assert_eq!(task.description, None);
        assert_eq!(task.assigned_user_id, None);
    }

    #[test]
    fn test_string_ids_are_coerced() {
        let task = request(json!({
            "title": "Ship",
            "projectId": "4",
            "authorUserId": "9",
            "assignedUserId": "11",
            "points": "5",
            "dueDate": "2024-03-01"
        }))
        .into_create_task()
        .unwrap();

        assert_eq!(task.project_id, 4);
        assert_eq!(task.author_user_id, 9);
        assert_eq!(task.assigned_user_id, Some(11));
        assert_eq!(task.points, Some(5));
        assert_eq!(task.due_date.unwrap().year(), 2024);
    }

    #[test]
    fn test_missing_required_fields() {
        for body in [
            json!({"projectId": 1, "authorUserId": 2}),
            json!({"title": "", "projectId": 1, "authorUserId": 2}),
            json!({"title": "Ship", "authorUserId": 2}),
            json!({"title": "Ship", "projectId": 1}),
            json!({"title": "Ship", "projectId": "", "authorUserId": 2}),
        ] {
            let err = request(body).into_create_task().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let task = request(json!({
            "title": "Ship",
            "projectId": 1,
            "authorUserId": 2,
            "status": "Blocked"
        }))
        .into_create_task()
        .unwrap();

        assert_eq!(task.status, "Blocked");
    }
}
