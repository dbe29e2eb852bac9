use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::models::SearchResults;
use crate::repositories::{ProjectRepository, TaskRepository, UserRepository};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub query: String,
}

/// Search tasks, projects and users
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching tasks, projects and users", body = SearchResults),
        (status = 400, description = "Missing query"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResults>> {
    let query = params.query.trim();

    let tasks = TaskRepository::search(&state.db, query).await?;
    let projects = ProjectRepository::search(&state.db, query).await?;
    let users = UserRepository::search(&state.db, query).await?;

    Ok(Json(SearchResults {
        tasks: Some(tasks),
        projects: Some(projects),
        users: Some(users),
    }))
}
