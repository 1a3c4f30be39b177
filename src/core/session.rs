//! Sign-up, sign-in and sign-out.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::adapters::ContentStore;
use crate::auth::{CredentialProvider, Credentials};
use crate::core::error::ContentError;

/// Manages the stored session token
pub struct SessionController {
    store: Arc<dyn ContentStore>,
    credentials: Arc<dyn CredentialProvider>,
}

impl SessionController {
    pub fn new(store: Arc<dyn ContentStore>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { store, credentials }
    }

    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<(), ContentError> {
        self.store.sign_up(credentials).await?;
        info!("Account created");
        Ok(())
    }

    /// Sign in and store the issued token
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), ContentError> {
        let token = self.store.sign_in(credentials).await?;
        self.credentials.set(&token)?;
        info!("Signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), ContentError> {
        self.credentials.clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn is_signed_in(&self) -> Result<bool, ContentError> {
        Ok(self.credentials.get()?.is_some())
    }
}

/// Drop a token the store has rejected.
///
/// Failing to clear is logged, not returned: the caller is already
/// reporting `Unauthorized`.
pub(crate) fn clear_rejected_token(credentials: &dyn CredentialProvider) {
    match credentials.clear() {
        Ok(()) => warn!("Session token rejected by store, signed out"),
        Err(e) => warn!(error = %e, "Session token rejected but could not be cleared"),
    }
}
