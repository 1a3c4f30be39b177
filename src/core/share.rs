//! Publishing and viewing shared collections.
//!
//! A share token grants read-only access to one owner's whole collection.
//! The shared view deliberately exposes no mutating operations.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::adapters::{Clipboard, ContentStore};
use crate::auth::CredentialProvider;
use crate::config::paths::SHARE_PATH_PREFIX;
use crate::core::error::ContentError;
use crate::core::session::clear_rejected_token;
use crate::library::Collection;

/// How the share URL reached the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Placed on the clipboard
    Copied,
    /// Clipboard unavailable; the caller must show the URL
    Displayed,
}

/// A freshly created share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub token: String,
    pub url: String,
    pub delivery: Delivery,
}

/// Outcome of resolving a share token
#[derive(Debug, Clone, PartialEq)]
pub enum SharedView {
    /// Read-only snapshot of the shared collection
    Available(Collection),
    /// The token never existed or was revoked
    InvalidLink,
}

/// Fully-qualified URL for a share token
pub fn share_url(origin: &str, token: &str) -> String {
    format!(
        "{}{}{}",
        origin.trim().trim_end_matches('/'),
        SHARE_PATH_PREFIX,
        token
    )
}

pub struct ShareController {
    store: Arc<dyn ContentStore>,
    credentials: Arc<dyn CredentialProvider>,
    origin: String,
}

impl ShareController {
    pub fn new(
        store: Arc<dyn ContentStore>,
        credentials: Arc<dyn CredentialProvider>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            store,
            credentials,
            origin: origin.into(),
        }
    }

    /// Publish the owner's collection and deliver the link.
    ///
    /// The link is copied to the clipboard when possible; otherwise
    /// [`Delivery::Displayed`] tells the caller to show it.
    #[instrument(skip_all)]
    pub async fn create_share_link(
        &self,
        clipboard: &dyn Clipboard,
    ) -> Result<ShareLink, ContentError> {
        let Some(token) = self.credentials.get()? else {
            return Err(ContentError::Unauthorized);
        };

        let share_token = match self.store.create_share_link(&token).await {
            Ok(share_token) => share_token,
            Err(ContentError::Unauthorized) => {
                clear_rejected_token(self.credentials.as_ref());
                return Err(ContentError::Unauthorized);
            }
            Err(e) => {
                warn!(error = %e, "Failed to create share link");
                return Err(e);
            }
        };

        let share_token = share_token.trim().to_string();
        if share_token.is_empty() {
            return Err(ContentError::Transport(
                "store returned an empty share token".to_string(),
            ));
        }

        let url = share_url(&self.origin, &share_token);
        let delivery = match clipboard.copy(&url).await {
            Ok(()) => Delivery::Copied,
            Err(e) => {
                warn!(clipboard = clipboard.name(), error = %e, "Clipboard unavailable, displaying link");
                Delivery::Displayed
            }
        };

        info!(?delivery, "Share link created");
        Ok(ShareLink {
            token: share_token,
            url,
            delivery,
        })
    }

    /// Revoke the owner's share link
    #[instrument(skip_all)]
    pub async fn disable_sharing(&self) -> Result<(), ContentError> {
        let Some(token) = self.credentials.get()? else {
            return Err(ContentError::Unauthorized);
        };

        match self.store.disable_sharing(&token).await {
            Ok(()) => {
                info!("Sharing disabled");
                Ok(())
            }
            Err(ContentError::Unauthorized) => {
                clear_rejected_token(self.credentials.as_ref());
                Err(ContentError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    /// Look up a shared collection. Needs no session.
    ///
    /// The share token is a credential and is kept out of the span.
    #[instrument(skip_all)]
    pub async fn resolve_shared_collection(&self, token: &str) -> Result<SharedView, ContentError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(SharedView::InvalidLink);
        }

        match self.store.list_shared(token).await {
            Ok(items) => {
                let collection = Collection::from_items(items);
                info!(count = collection.len(), "Shared collection loaded");
                Ok(SharedView::Available(collection))
            }
            Err(ContentError::NotFound) => {
                info!("Share link invalid or expired");
                Ok(SharedView::InvalidLink)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load shared collection");
                Err(e)
            }
        }
    }
}
