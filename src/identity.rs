//! Seam to the managed identity provider.
//!
//! The provider owns sign-up, sign-in and token refresh; this crate only asks
//! it who is signed in and for the current session tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ClientError, Mutation};
use crate::models::{NewUser, User};

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub username: String,
    /// Provider-side user id (the subject)
    pub user_id: String,
}

/// Session tokens of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_sub: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("no signed-in user")]
    NotSignedIn,

    #[error("no session found")]
    NoSession,

    #[error("{0}")]
    Provider(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<IdentityUser, IdentityError>;

    async fn fetch_session(&self) -> Result<Session, IdentityError>;
}

/// Fixed identity, for scripts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<IdentityUser>,
    session: Session,
}

impl StaticIdentity {
    /// Nobody signed in; requests go out without a token
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(username: &str, subject: &str, access_token: &str) -> Self {
        Self {
            user: Some(IdentityUser {
                username: username.to_string(),
                user_id: subject.to_string(),
            }),
            session: Session {
                user_sub: Some(subject.to_string()),
                access_token: Some(access_token.to_string()),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<IdentityUser, IdentityError> {
        self.user.clone().ok_or(IdentityError::NotSignedIn)
    }

    async fn fetch_session(&self) -> Result<Session, IdentityError> {
        Ok(self.session.clone())
    }
}

/// Minimal record of a confirmed sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    pub username: String,
    pub email: String,
    /// Identity-provider subject of the new account
    pub subject: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignUpError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Forward a confirmed sign-up to the backend user-creation endpoint
pub async fn forward_sign_up(
    client: &ApiClient,
    sign_up: &SignUp,
) -> Result<Mutation<User>, SignUpError> {
    let username = sign_up.username.trim();
    let email = sign_up.email.trim();
    let subject = sign_up.subject.trim();

    if username.is_empty() {
        return Err(SignUpError::MissingField("username"));
    }
    if email.is_empty() {
        return Err(SignUpError::MissingField("email"));
    }
    if subject.is_empty() {
        return Err(SignUpError::MissingField("subject"));
    }

    let created = client
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            cognito_id: Some(subject.to_string()),
            ..Default::default()
        })
        .await?;

    tracing::info!(user_id = created.data.user_id, "Sign-up forwarded to backend");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::client::ClientConfig;

    #[tokio::test]
    async fn test_anonymous_identity_has_no_token() {
        let identity = StaticIdentity::anonymous();

        assert!(matches!(
            identity.current_user().await,
            Err(IdentityError::NotSignedIn)
        ));
        assert_eq!(identity.fetch_session().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn test_blank_sign_up_is_rejected_before_any_request() {
        // Nothing listens on this port; a request would fail with a transport error
        let client = ApiClient::new(
            ClientConfig::new("http://127.0.0.1:9"),
            Arc::new(StaticIdentity::anonymous()),
        )
        .unwrap();

        let sign_up = SignUp {
            username: "  ".to_string(),
            email: "ana@example.com".to_string(),
            subject: "sub-1".to_string(),
        };

        let err = forward_sign_up(&client, &sign_up).await.unwrap_err();
        assert!(matches!(err, SignUpError::MissingField("username")));
    }
}
