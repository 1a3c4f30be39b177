//! REST client for the remote content store.
//!
//! Endpoints live under `/api/v1`. Owner-scoped calls carry a bearer token;
//! sign-up, sign-in and shared collection lookups are anonymous.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::ContentStore;
use crate::auth::{AuthToken, Credentials};
use crate::core::error::ContentError;
use crate::library::{ContentId, ContentItem, CreateContent};

/// How a failed response is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Bearer-authenticated; 401/403 mean the session is gone
    Owner,
    /// Share token lookup; 404/410 mean the link is invalid
    Shared,
    /// Sign-up / sign-in; every failure is a server message
    Anonymous,
}

/// Error body shape used by the store
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Items either as a bare array or wrapped in `{ "content": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsResponse {
    Bare(Vec<ContentItem>),
    Wrapped {
        #[serde(default)]
        content: Vec<ContentItem>,
    },
}

impl ItemsResponse {
    fn into_items(self) -> Vec<ContentItem> {
        match self {
            ItemsResponse::Bare(items) => items,
            ItemsResponse::Wrapped { content } => content,
        }
    }
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
}

#[derive(Deserialize)]
struct ShareResponse {
    #[serde(rename = "shareToken", alias = "hash", alias = "link")]
    share_token: String,
}

/// HTTP implementation of [`ContentStore`]
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    /// Create a store client with the transport's default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            client: Client::new(),
        }
    }

    /// Create a store client with a request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            client,
        })
    }

    /// Create from the resolved configuration
    pub fn from_config(config: &crate::config::ResolvedConfig) -> anyhow::Result<Self> {
        Self::with_timeout(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build API URL
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// API URL with one trailing, percent-encoded path segment
    fn api_url_with(&self, path: &str, segment: &str) -> Result<reqwest::Url, ContentError> {
        let mut url = reqwest::Url::parse(&self.api_url(path))
            .map_err(|e| ContentError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ContentError::Transport("store URL cannot be a base".to_string()))?
            .push(segment);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, scope: Scope) -> Result<Response, ContentError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        // The URL may end in a share token; never log it
        debug!(status = status.as_u16(), ?scope, "Store response");

        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are optional and may not be JSON
        let body = response.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty());

        Err(failure(status, message, scope))
    }

    async fn items(
        &self,
        request: RequestBuilder,
        scope: Scope,
    ) -> Result<Vec<ContentItem>, ContentError> {
        let response = self.send(request, scope).await?;
        let items: ItemsResponse = response.json().await.map_err(transport)?;
        Ok(items.into_items())
    }
}

fn normalize_base(base: String) -> String {
    base.trim().trim_end_matches('/').to_string()
}

// reqwest errors carry the request URL, which may hold a share token
fn transport(e: reqwest::Error) -> ContentError {
    ContentError::Transport(e.without_url().to_string())
}

fn failure(status: StatusCode, message: Option<String>, scope: Scope) -> ContentError {
    match (scope, status) {
        (Scope::Owner, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            ContentError::Unauthorized
        }
        (Scope::Shared, StatusCode::NOT_FOUND | StatusCode::GONE) => ContentError::NotFound,
        _ => ContentError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), ContentError> {
        let request = self.client.post(self.api_url("signup")).json(credentials);
        self.send(request, Scope::Anonymous).await?;
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthToken, ContentError> {
        let request = self.client.post(self.api_url("signin")).json(credentials);
        let response = self.send(request, Scope::Anonymous).await?;
        let body: SignInResponse = response.json().await.map_err(transport)?;
        Ok(AuthToken::new(body.token))
    }

    async fn list_content(&self, token: &AuthToken) -> Result<Vec<ContentItem>, ContentError> {
        let request = self
            .client
            .get(self.api_url("content"))
            .header("Authorization", token.bearer());
        self.items(request, Scope::Owner).await
    }

    async fn create_content(
        &self,
        token: &AuthToken,
        content: &CreateContent,
    ) -> Result<(), ContentError> {
        let request = self
            .client
            .post(self.api_url("content"))
            .header("Authorization", token.bearer())
            .json(content);
        self.send(request, Scope::Owner).await?;
        Ok(())
    }

    async fn delete_content(&self, token: &AuthToken, id: &ContentId) -> Result<(), ContentError> {
        let url = self.api_url_with("content", id.as_str())?;
        let request = self
            .client
            .delete(url)
            .header("Authorization", token.bearer());
        self.send(request, Scope::Owner).await?;
        Ok(())
    }

    async fn create_share_link(&self, token: &AuthToken) -> Result<String, ContentError> {
        let request = self
            .client
            .post(self.api_url("brain/share"))
            .header("Authorization", token.bearer())
            .json(&serde_json::json!({ "share": true }));
        let response = self.send(request, Scope::Owner).await?;
        let body: ShareResponse = response.json().await.map_err(transport)?;
        Ok(body.share_token)
    }

    async fn disable_sharing(&self, token: &AuthToken) -> Result<(), ContentError> {
        let request = self
            .client
            .post(self.api_url("brain/share"))
            .header("Authorization", token.bearer())
            .json(&serde_json::json!({ "share": false }));
        self.send(request, Scope::Owner).await?;
        Ok(())
    }

    async fn list_shared(&self, share_token: &str) -> Result<Vec<ContentItem>, ContentError> {
        let url = self.api_url_with("brain", share_token)?;
        self.items(self.client.get(url), Scope::Shared).await
    }
}
