use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entity::attachment::{self, Entity as AttachmentEntity};
use crate::entity::comment::{self, Entity as CommentEntity};
use crate::entity::task::{self, ActiveModel, Column, Entity as TaskEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Attachment, Comment, CreateTask, Task, User};
use crate::repositories::{contains_literal, UserRepository};

/// Which relations to load alongside tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expand {
    /// Author and assignee
    People,
    /// Author, assignee, comments and attachments
    Everything,
}

/// Task repository for database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Insert a task and return it with every relation expanded
    pub async fn create(db: &DatabaseConnection, input: &CreateTask) -> AppResult<Task> {
        let model = ActiveModel {
            id: NotSet,
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            status: Set(Some(input.status.clone())),
            priority: Set(Some(input.priority.clone())),
            tags: Set(input.tags.clone()),
            start_date: Set(input.start_date),
            due_date: Set(input.due_date),
            points: Set(input.points),
            project_id: Set(input.project_id),
            author_user_id: Set(input.author_user_id),
            assigned_user_id: Set(input.assigned_user_id),
        };

        let inserted = model.insert(db).await?;
        let mut tasks = Self::expand(db, vec![inserted], Expand::Everything).await?;
        tasks
            .pop()
            .ok_or_else(|| AppError::Internal("created task missing after expand".to_string()))
    }

    /// Tasks of one project
    pub async fn list_by_project(db: &DatabaseConnection, project_id: i32) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(Column::ProjectId.eq(project_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Self::expand(db, models, Expand::Everything).await
    }

    /// Tasks the user authored or is assigned to; a task matching both appears once
    pub async fn list_by_user(db: &DatabaseConnection, user_id: i32) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(
                Condition::any()
                    .add(Column::AuthorUserId.eq(user_id))
                    .add(Column::AssignedUserId.eq(user_id)),
            )
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Self::expand(db, models, Expand::People).await
    }

    /// Overwrite the status with whatever value was supplied
    pub async fn update_status(db: &DatabaseConnection, id: i32, status: &str) -> AppResult<Task> {
        let model = TaskEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::Database(format!("Task {} not found", id)))?;

        let mut active: ActiveModel = model.into();
        active.status = Set(Some(status.to_string()));

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Tasks whose title or description contains the query
    pub async fn search(db: &DatabaseConnection, query: &str) -> AppResult<Vec<Task>> {
        let models = TaskEntity::find()
            .filter(
                Condition::any()
                    .add(contains_literal(Column::Title, query))
                    .add(contains_literal(Column::Description, query)),
            )
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn expand(
        db: &DatabaseConnection,
        models: Vec<task::Model>,
        expand: Expand,
    ) -> AppResult<Vec<Task>> {
        let mut user_ids: Vec<i32> = models
            .iter()
            .flat_map(|m| std::iter::once(m.author_user_id).chain(m.assigned_user_id))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<i32, User> = UserRepository::find_many(db, user_ids)
            .await?
            .into_iter()
            .map(|u| (u.user_id, u))
            .collect();

        let (mut comments, mut attachments) = match expand {
            Expand::People => (HashMap::new(), HashMap::new()),
            Expand::Everything => {
                let task_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
                (
                    Self::comments_by_task(db, task_ids.clone()).await?,
                    Self::attachments_by_task(db, task_ids).await?,
                )
            }
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let author = users.get(&m.author_user_id).cloned();
                let assignee = m.assigned_user_id.and_then(|id| users.get(&id).cloned());
                let (task_comments, task_attachments) = match expand {
                    Expand::People => (None, None),
                    Expand::Everything => (
                        Some(comments.remove(&m.id).unwrap_or_default()),
                        Some(attachments.remove(&m.id).unwrap_or_default()),
                    ),
                };

                let mut task: Task = m.into();
                task.author = author;
                task.assignee = assignee;
                task.comments = task_comments;
                task.attachments = task_attachments;
                task
            })
            .collect())
    }

    async fn comments_by_task(
        db: &DatabaseConnection,
        task_ids: Vec<i32>,
    ) -> AppResult<HashMap<i32, Vec<Comment>>> {
        let mut grouped: HashMap<i32, Vec<Comment>> = HashMap::new();
        if task_ids.is_empty() {
            return Ok(grouped);
        }

        let models = CommentEntity::find()
            .filter(comment::Column::TaskId.is_in(task_ids))
            .order_by_asc(comment::Column::Id)
            .all(db)
            .await?;

        for m in models {
            grouped.entry(m.task_id).or_default().push(Comment {
                id: m.id,
                text: m.text,
                task_id: m.task_id,
                user_id: m.user_id,
            });
        }
        Ok(grouped)
    }

    async fn attachments_by_task(
        db: &DatabaseConnection,
        task_ids: Vec<i32>,
    ) -> AppResult<HashMap<i32, Vec<Attachment>>> {
        let mut grouped: HashMap<i32, Vec<Attachment>> = HashMap::new();
        if task_ids.is_empty() {
            return Ok(grouped);
        }

        let models = AttachmentEntity::find()
            .filter(attachment::Column::TaskId.is_in(task_ids))
            .order_by_asc(attachment::Column::Id)
            .all(db)
            .await?;

        for m in models {
            grouped.entry(m.task_id).or_default().push(Attachment {
                id: m.id,
                file_url: m.file_url,
                file_name: m.file_name,
                task_id: m.task_id,
                uploaded_by_id: m.uploaded_by_id,
            });
        }
        Ok(grouped)
    }
}

// Conversion from SeaORM model to our domain model; relations start unloaded
impl From<task::Model> for Task {
    fn from(m: task::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            status: m.status,
            priority: m.priority,
            tags: m.tags,
            start_date: m.start_date,
            due_date: m.due_date,
            points: m.points,
            project_id: m.project_id,
            author_user_id: m.author_user_id,
            assigned_user_id: m.assigned_user_id,
            author: None,
            assignee: None,
            comments: None,
            attachments: None,
        }
    }
}
