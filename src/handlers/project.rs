use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::common::{coerce_date, present, validate_required};
use crate::middlewares::AuthUser;
use crate::models::{CreateProject, Project};
use crate::repositories::{ProjectRepository, Repository};
use crate::state::AppState;

// ============ Request DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ============ Handlers ============

/// List all projects
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "List of projects", body = [Project]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn get_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepository::list(&state.db).await?;
    Ok(Json(projects))
}

/// Create a new project
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = Project),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let create_project = CreateProject {
        name: validate_required("name", payload.name)?,
        description: present(payload.description),
        start_date: coerce_date("startDate", payload.start_date)?,
        end_date: coerce_date("endDate", payload.end_date)?,
    };

    let project = ProjectRepository::create(&state.db, &create_project).await?;
    tracing::info!(project_id = project.id, subject = %user.subject, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}
