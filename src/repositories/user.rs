use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::user::{self, ActiveModel, Column, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repositories::{contains_literal, Repository};

/// User repository for database operations
pub struct UserRepository;

// Implement the base Repository trait
#[async_trait]
impl Repository<User> for UserRepository {
    async fn list(db: &DatabaseConnection) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(Column::UserId)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// User-specific methods (not in the base trait)
impl UserRepository {
    /// Create a new user
    pub async fn create(db: &DatabaseConnection, input: &NewUser) -> AppResult<User> {
        let model = ActiveModel {
            user_id: NotSet,
            cognito_id: Set(input.cognito_id.clone()),
            username: Set(input.username.clone()),
            email: Set(input.email.clone()),
            profile_picture_url: Set(input.profile_picture_url.clone()),
            team_id: Set(input.team_id),
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Find user by identity-provider subject
    pub async fn find_by_cognito_id(db: &DatabaseConnection, cognito_id: &str) -> AppResult<User> {
        let model = UserEntity::find()
            .filter(Column::CognitoId.eq(cognito_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::Database(format!("User {} not found", cognito_id)))?;

        Ok(model.into())
    }

    /// Users whose username contains the query
    pub async fn search(db: &DatabaseConnection, query: &str) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(contains_literal(Column::Username, query))
            .order_by_asc(Column::UserId)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Load several users at once; unknown ids are skipped
    pub async fn find_many(db: &DatabaseConnection, ids: Vec<i32>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(Column::UserId.is_in(ids))
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// Conversion from SeaORM model to our domain model
impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            user_id: m.user_id,
            username: m.username,
            email: m.email,
            profile_picture_url: m.profile_picture_url,
            cognito_id: m.cognito_id,
            team_id: m.team_id,
        }
    }
}
