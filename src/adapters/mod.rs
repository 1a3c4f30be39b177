//! Adapter interfaces for external systems.
//!
//! The remote content store and the system clipboard sit behind traits so
//! the controllers can run against fakes in tests.

pub mod clipboard;
pub mod http;

use anyhow::Result;
use async_trait::async_trait;

use crate::auth::{AuthToken, Credentials};
use crate::core::error::ContentError;
use crate::library::{ContentId, ContentItem, CreateContent};

pub use clipboard::{NoClipboard, SystemClipboard};
pub use http::HttpStore;

/// Operations of the remote content store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Register a new account
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), ContentError>;

    /// Exchange credentials for a bearer token
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthToken, ContentError>;

    /// Every item owned by the token's user
    async fn list_content(&self, token: &AuthToken) -> Result<Vec<ContentItem>, ContentError>;

    async fn create_content(
        &self,
        token: &AuthToken,
        content: &CreateContent,
    ) -> Result<(), ContentError>;

    async fn delete_content(&self, token: &AuthToken, id: &ContentId) -> Result<(), ContentError>;

    /// Publish the owner's collection and return the share token
    async fn create_share_link(&self, token: &AuthToken) -> Result<String, ContentError>;

    /// Revoke the owner's share token
    async fn disable_sharing(&self, token: &AuthToken) -> Result<(), ContentError>;

    /// Snapshot behind a share token. No authentication.
    async fn list_shared(&self, share_token: &str) -> Result<Vec<ContentItem>, ContentError>;
}

/// Destination for a share link
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    async fn copy(&self, text: &str) -> Result<()>;
}
