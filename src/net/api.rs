//! REST client for the portal backend.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] with the backend's `detail`
//! and `message` fields (when present) extracted for the state layer's
//! user-facing message selection. Transport faults stay separate so callers
//! can tell a rejected request from an unreachable server.
//!
//! Every authenticated call takes the bearer token explicitly; the client
//! holds no ambient credential state.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{Doctor, Patient, RegisterRequest, TokenResponse, UserRecord};

/// Failure of a portal REST call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http status {status}")]
    Status {
        status: u16,
        /// Backend `detail` field, FastAPI's conventional error slot.
        detail: Option<String>,
        /// Backend `message` field, used by some registration failures.
        message: Option<String>,
    },
}

impl ApiError {
    /// Server-provided `detail` text, if this is a status error carrying one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            Self::Transport(_) => None,
        }
    }

    /// Server-provided `message` text, if this is a status error carrying one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// Build a [`ApiError::Status`] from a response status and decoded error body.
#[must_use]
pub(crate) fn status_error(status: u16, body: &Value) -> ApiError {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };
    ApiError::Status {
        status,
        detail: field("detail"),
        message: field("message"),
    }
}

/// Portal REST operations consumed by the state engine.
///
/// The seam exists so state-layer tests can substitute an in-process fake;
/// production code uses [`HttpPortalApi`].
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `POST /auth/token` with form-encoded credentials.
    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;

    /// `GET /auth/me` with the given bearer token.
    async fn fetch_me(&self, token: &str) -> Result<UserRecord, ApiError>;

    /// `POST /auth/register`.
    async fn register(&self, request: &RegisterRequest) -> Result<UserRecord, ApiError>;

    /// `GET /patients/` with the given bearer token.
    async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, ApiError>;

    /// `GET /doctors/` with the given bearer token.
    async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, ApiError>;
}

/// `reqwest`-backed [`PortalApi`] implementation.
pub struct HttpPortalApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortalApi {
    /// Create a client against the given base URL (e.g.
    /// `http://127.0.0.1:8000/api/v1`). A trailing slash is tolerated.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response into [`ApiError::Status`], decoding the
    /// error body best-effort.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(status_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_me(&self, token: &str) -> Result<UserRecord, ApiError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserRecord, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, ApiError> {
        let response = self
            .client
            .get(self.url("/patients/"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, ApiError> {
        let response = self
            .client
            .get(self.url("/doctors/"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
