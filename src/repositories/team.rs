use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entity::team::{self, Column, Entity as TeamEntity};
use crate::error::AppResult;
use crate::models::Team;
use crate::repositories::{Repository, UserRepository};

pub struct TeamRepository;

#[async_trait]
impl Repository<Team> for TeamRepository {
    async fn list(db: &DatabaseConnection) -> AppResult<Vec<Team>> {
        let models = TeamEntity::find().order_by_asc(Column::Id).all(db).await?;
        Self::with_usernames(db, models).await
    }
}

impl TeamRepository {
    /// Resolve the product owner and project manager usernames
    async fn with_usernames(db: &DatabaseConnection, models: Vec<team::Model>) -> AppResult<Vec<Team>> {
        let mut ids: Vec<i32> = models
            .iter()
            .flat_map(|m| [m.product_owner_user_id, m.project_manager_user_id])
            .flatten()
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let usernames: HashMap<i32, String> = UserRepository::find_many(db, ids)
            .await?
            .into_iter()
            .map(|u| (u.user_id, u.username))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let lookup = |id: Option<i32>| id.and_then(|id| usernames.get(&id).cloned());
                Team {
                    product_owner_username: lookup(m.product_owner_user_id),
                    project_manager_username: lookup(m.project_manager_user_id),
                    team_id: m.id,
                    team_name: m.team_name,
                    product_owner_user_id: m.product_owner_user_id,
                    project_manager_user_id: m.project_manager_user_id,
                }
            })
            .collect())
    }
}
