// Library crate for taskdeck
// Backend router plus the client-side data layer (API client, forms, views)

pub mod client;
pub mod config;
pub mod dates;
pub mod entity;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod identity;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod ui_state;
pub mod views;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_project, create_task, create_user, get_projects, get_tasks, get_teams, get_user,
    get_user_tasks, get_users, search, update_task_status,
};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Every resource route requires a bearer token
    let protected_routes = Router::new()
        // Project routes
        .route("/projects", get(get_projects).post(create_project))
        // Task routes
        .route("/tasks", get(get_tasks).post(create_task))
        .route("/tasks/user/{user_id}", get(get_user_tasks))
        .route("/tasks/{task_id}/status", patch(update_task_status))
        // User routes
        .route("/users", get(get_users).post(create_user))
        .route("/users/{cognito_id}", get(get_user))
        // Team routes
        .route("/teams", get(get_teams))
        // Search
        .route("/search", get(search))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/", get(|| async { "This is home route" }))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}
