use std::sync::Arc;

use axum_test::TestServer;
use taskdeck::build_router;
use taskdeck::client::{ApiClient, ClientConfig};
use taskdeck::config::Config;
use taskdeck::identity::StaticIdentity;
use taskdeck::state::AppState;
use tokio::net::TcpListener;

use super::factory::TestAuth;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        // Fresh in-memory database per app, schema built from the entities
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expiration_hours: 24,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origin: None,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let state = AppState::new(test_config())
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }

    /// Serve the same state on a real local port, for tests driving the HTTP client.
    /// Returns the base URL.
    pub async fn spawn_listener(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = build_router(self.state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test listener failed");
        });

        format!("http://{}", addr)
    }
}

/// API client for `base_url`, signed in as `auth` or anonymous
#[allow(dead_code)]
pub fn api_client(base_url: &str, auth: Option<&TestAuth>) -> ApiClient {
    let identity = match auth {
        Some(auth) => StaticIdentity::signed_in(&auth.user.username, &auth.subject, &auth.token),
        None => StaticIdentity::anonymous(),
    };

    ApiClient::new(ClientConfig::new(base_url), Arc::new(identity)).expect("Failed to build client")
}
