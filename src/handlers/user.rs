use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::handlers::common::{present, validate_required};
use crate::middlewares::AuthUser;
use crate::models::{NewUser, User};
use crate::repositories::{Repository, UserRepository};
use crate::state::AppState;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List of users", body = [User]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn get_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = UserRepository::list(&state.db).await?;
    Ok(Json(users))
}

/// Look up a user by identity-provider subject
#[utoipa::path(
    get,
    path = "/users/{cognitoId}",
    params(
        ("cognitoId" = String, Path, description = "Identity-provider subject")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Unknown subject or database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(cognito_id): Path<String>,
) -> AppResult<Json<User>> {
    let user = UserRepository::find_by_cognito_id(&state.db, &cognito_id).await?;
    Ok(Json(user))
}

/// Record a user after the identity provider confirmed its sign-up
#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn create_user(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let new_user = NewUser {
        username: validate_required("username", Some(payload.username))?,
        email: validate_required("email", Some(payload.email))?,
        cognito_id: present(payload.cognito_id),
        profile_picture_url: present(payload.profile_picture_url),
        team_id: payload.team_id,
    };

    let user = UserRepository::create(&state.db, &new_user).await?;
    tracing::info!(user_id = user.user_id, subject = %caller.subject, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}
