//! Typed API client with a tagged query cache.
//!
//! Reads go through [`ApiClient::query`]: a fresh cached result is returned
//! without touching the network, a stale or missing one is fetched and stored
//! with the tags its [`Endpoint`] provides. A result whose fetch overlapped an
//! invalidation of a kind it provides is stored already stale. Writes go through
//! [`ApiClient::mutate`], which invalidates the endpoint's tags after a
//! successful response so the next read of any dependent query refetches.

pub mod cache;
pub mod endpoints;

pub use cache::{FetchTicket, Invalidation, QueryCache};
pub use endpoints::{Endpoint, Tag, TagKind};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};

use crate::config::ConfigError;
use crate::identity::{IdentityError, IdentityProvider, IdentityUser};
use crate::models::{NewProject, NewTask, NewUser, Project, SearchResults, Task, Team, User};

const AUTH_USER_KEY: &str = "getAuthUser";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load client configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("API_BASE_URL").map_err(|_| ConfigError::Missing("API_BASE_URL"))?;
        let timeout_secs: u64 = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("API_TIMEOUT_SECS"))?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} failed with status {status}: {message}")]
    Http {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("identity provider: {0}")]
    Identity(#[from] IdentityError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Result of a write plus the tags it invalidated
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub data: T,
    pub invalidated: Vec<Tag>,
}

/// Identity user, its subject and the backend user record, fetched as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserInfo {
    pub user: IdentityUser,
    pub user_sub: String,
    pub user_details: User,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
    cache: Arc<Mutex<QueryCache>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, identity: Arc<dyn IdentityProvider>) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity,
            cache: Arc::new(Mutex::new(QueryCache::new())),
        })
    }

    // ============ Queries ============

    pub async fn get_projects(&self) -> ClientResult<Vec<Project>> {
        self.query(Endpoint::GetProjects).await
    }

    pub async fn get_tasks(&self, project_id: i32) -> ClientResult<Vec<Task>> {
        self.query(Endpoint::GetTasks { project_id }).await
    }

    pub async fn get_tasks_by_user(&self, user_id: i32) -> ClientResult<Vec<Task>> {
        self.query(Endpoint::GetTasksByUser { user_id }).await
    }

    pub async fn get_users(&self) -> ClientResult<Vec<User>> {
        self.query(Endpoint::GetUsers).await
    }

    pub async fn get_teams(&self) -> ClientResult<Vec<Team>> {
        self.query(Endpoint::GetTeams).await
    }

    pub async fn search(&self, query: &str) -> ClientResult<SearchResults> {
        self.query(Endpoint::Search {
            query: query.to_string(),
        })
        .await
    }

    /// Identity user, session subject and backend user record as one result.
    /// Any failing step fails the whole lookup.
    pub async fn get_auth_user(&self) -> ClientResult<AuthUserInfo> {
        if let Some(cached) = self.cached(AUTH_USER_KEY).await {
            return decode(AUTH_USER_KEY, cached);
        }
        let ticket = self.cache.lock().await.ticket();

        let (user, session) = futures::future::try_join(
            self.identity.current_user(),
            self.identity.fetch_session(),
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "getAuthUser failed"))?;

        let user_sub = session.user_sub.ok_or(IdentityError::NoSession)?;
        let details = self
            .send(&Endpoint::GetUser {
                cognito_id: user_sub.clone(),
            })
            .await?;
        let user_details: User = decode(AUTH_USER_KEY, details)?;

        let info = AuthUserInfo {
            user,
            user_sub,
            user_details,
        };
        let value = serde_json::to_value(&info).map_err(ClientError::Encode)?;
        self.cache
            .lock()
            .await
            .store(AUTH_USER_KEY.to_string(), value, Vec::new(), &ticket);

        Ok(info)
    }

    // ============ Mutations ============

    pub async fn create_project(&self, project: NewProject) -> ClientResult<Mutation<Project>> {
        self.mutate(Endpoint::CreateProject(project)).await
    }

    pub async fn create_task(&self, task: NewTask) -> ClientResult<Mutation<Task>> {
        self.mutate(Endpoint::CreateTask(task)).await
    }

    pub async fn update_task_status(
        &self,
        task_id: i32,
        status: impl Into<String>,
    ) -> ClientResult<Mutation<Task>> {
        self.mutate(Endpoint::UpdateTaskStatus {
            task_id,
            status: status.into(),
        })
        .await
    }

    pub async fn create_user(&self, user: NewUser) -> ClientResult<Mutation<User>> {
        self.mutate(Endpoint::CreateUser(user)).await
    }

    // ============ Cache access ============

    /// Listen for invalidations to re-render dependent views
    pub async fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.cache.lock().await.subscribe()
    }

    /// `Some(true)` when the query result must be refetched on next read
    pub async fn is_stale(&self, endpoint: &Endpoint) -> Option<bool> {
        let key = endpoint.cache_key()?;
        self.cache.lock().await.is_stale(&key)
    }

    /// Forget every cached result, e.g. after sign-out
    pub async fn reset(&self) {
        self.cache.lock().await.clear();
    }

    // ============ Plumbing ============

    pub async fn query<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ClientResult<T> {
        let key = endpoint.cache_key();

        if let Some(key) = &key {
            if let Some(cached) = self.cached(key).await {
                tracing::trace!(key = %key, "Cache hit");
                return decode(endpoint.name(), cached);
            }
        }

        let ticket = self.cache.lock().await.ticket();
        let value = self.send(&endpoint).await?;

        if let Some(key) = key {
            let tags = endpoint.provides(&value);
            self.cache
                .lock()
                .await
                .store(key, value.clone(), tags, &ticket);
        }

        decode(endpoint.name(), value)
    }

    pub async fn mutate<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ClientResult<Mutation<T>> {
        let value = self.send(&endpoint).await?;
        let data = decode(endpoint.name(), value)?;

        let invalidated = endpoint.invalidates();
        self.cache.lock().await.invalidate(&invalidated);

        Ok(Mutation { data, invalidated })
    }

    async fn cached(&self, key: &str) -> Option<Value> {
        self.cache.lock().await.get_fresh(key).cloned()
    }

    /// Issue one request; no retries
    async fn send(&self, endpoint: &Endpoint) -> ClientResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let mut request = self
            .http
            .request(endpoint.method(), &url)
            .query(&endpoint.query_params());

        if let Some(body) = endpoint.body().map_err(ClientError::Encode)? {
            request = request.json(&body);
        }

        if let Some(token) = self.access_token().await {
            request = request.bearer_auth(token);
        }

        tracing::debug!(endpoint = endpoint.name(), url = %url, "Sending request");
        let response = request.send().await.inspect_err(|e| {
            tracing::error!(endpoint = endpoint.name(), error = %e, "Request failed");
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(endpoint = endpoint.name(), error = %e, "Could not read error body");
                    String::new()
                }
            };
            let message = error_message(&body, status.canonical_reason().unwrap_or("error"));
            tracing::error!(
                endpoint = endpoint.name(),
                status = status.as_u16(),
                message = %message,
                "Request rejected"
            );
            return Err(ClientError::Http {
                endpoint: endpoint.name(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Current access token; a missing session only means the call goes out unauthenticated
    async fn access_token(&self) -> Option<String> {
        match self.identity.fetch_session().await {
            Ok(session) => session.access_token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve session, sending without token");
                None
            }
        }
    }
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode { endpoint, source })
}

/// Prefer the server's detail text, then its error label, then the raw body
fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["details", "message", "error"] {
            if let Some(text) = map.get(field).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }

    if body.trim().is_empty() {
        fallback.to_string()
    } else {
        body.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_details() {
        let body = r#"{"error": "Validation error", "details": "title is required"}"#;
        assert_eq!(error_message(body, "Bad Request"), "title is required");

        let body = r#"{"error": "Database error"}"#;
        assert_eq!(error_message(body, "Internal Server Error"), "Database error");

        assert_eq!(error_message("", "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message("upstream down", "Bad Gateway"), "upstream down");
    }

    #[test]
    fn test_client_config_trims_base_url() {
        let identity = Arc::new(crate::identity::StaticIdentity::anonymous());
        let client = ApiClient::new(ClientConfig::new("http://localhost:8000/"), identity).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
