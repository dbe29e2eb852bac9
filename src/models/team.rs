use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: i32,
    pub team_name: String,
    pub product_owner_user_id: Option<i32>,
    pub project_manager_user_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_owner_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_manager_username: Option<String>,
}
