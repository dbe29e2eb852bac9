use anyhow::Context;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use taskdeck::config::Config;
use taskdeck::handlers::{CreateProjectRequest, CreateTaskRequest};
use taskdeck::models::{
    Attachment, Comment, NewUser, Priority, Project, SearchResults, Status, StatusUpdate, Task,
    Team, User,
};
use taskdeck::state::AppState;
use taskdeck::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::project::get_projects,
        handlers::project::create_project,
        handlers::task::get_tasks,
        handlers::task::create_task,
        handlers::task::update_task_status,
        handlers::task::get_user_tasks,
        handlers::user::get_users,
        handlers::user::get_user,
        handlers::user::create_user,
        handlers::team::get_teams,
        handlers::search::search,
    ),
    components(schemas(
        Project,
        CreateProjectRequest,
        Task,
        CreateTaskRequest,
        StatusUpdate,
        Status,
        Priority,
        Comment,
        Attachment,
        User,
        NewUser,
        Team,
        SearchResults,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Projects", description = "Project endpoints"),
        (name = "Tasks", description = "Task endpoints"),
        (name = "Users", description = "User endpoints"),
        (name = "Teams", description = "Team endpoints"),
        (name = "Search", description = "Cross-resource search")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.server_addr();

    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("Database connection established");

    let app = build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
