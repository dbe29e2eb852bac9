use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::Team;
use crate::repositories::{Repository, TeamRepository};
use crate::state::AppState;

/// List all teams with owner and manager usernames
#[utoipa::path(
    get,
    path = "/teams",
    responses(
        (status = 200, description = "List of teams", body = [Team]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teams"
)]
pub async fn get_teams(State(state): State<AppState>) -> AppResult<Json<Vec<Team>>> {
    let teams = TeamRepository::list(&state.db).await?;
    Ok(Json(teams))
}
