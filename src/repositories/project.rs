use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::entity::project::{self, ActiveModel, Column, Entity as ProjectEntity};
use crate::error::AppResult;
use crate::models::{CreateProject, Project};
use crate::repositories::{contains_literal, Repository};

/// Project repository for database operations
pub struct ProjectRepository;

#[async_trait]
impl Repository<Project> for ProjectRepository {
    async fn list(db: &DatabaseConnection) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

impl ProjectRepository {
    /// Create a new project; absent optional fields are left to the store
    pub async fn create(db: &DatabaseConnection, input: &CreateProject) -> AppResult<Project> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Projects whose name contains the query
    pub async fn search(db: &DatabaseConnection, query: &str) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .filter(contains_literal(Column::Name, query))
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// Conversion from SeaORM model to our domain model
impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}
