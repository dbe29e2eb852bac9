use crate::client::ApiClient;
use crate::models::User;
use crate::views::ViewState;

/// Row of the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    /// Full picture URL, when the user has one
    pub profile_picture: Option<String>,
    pub email: String,
    pub team_id: Option<i32>,
}

impl UserRow {
    /// `asset_base` is prefixed to stored picture file names
    pub fn new(user: &User, asset_base: &str) -> Self {
        Self {
            id: user.user_id,
            username: user.username.clone(),
            profile_picture: user
                .profile_picture_url
                .as_deref()
                .filter(|file| !file.is_empty())
                .map(|file| format!("{}/{}", asset_base.trim_end_matches('/'), file)),
            email: user.email.clone(),
            team_id: user.team_id,
        }
    }
}

pub async fn load_users(client: &ApiClient, asset_base: &str) -> ViewState<Vec<UserRow>> {
    ViewState::from_list(client.get_users().await, "users")
        .map(|users| users.iter().map(|user| UserRow::new(user, asset_base)).collect())
}
