//! Session credentials.
//!
//! The bearer token lives in a single persistent slot behind
//! [`CredentialProvider`], so controllers never touch storage directly.

pub mod token_store;

use std::sync::Mutex;

use serde::Serialize;

use crate::core::error::{ContentError, ValidationError};

pub use token_store::FileTokenStore;

/// Opaque bearer credential issued at sign-in
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Never print the token itself
impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Username and password for sign-up / sign-in
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials, rejecting blank fields before any request
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.into().trim().to_string();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::EmptyCredentials);
        }
        Ok(Self { username, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Persistent, synchronous slot holding the current token
pub trait CredentialProvider: Send + Sync {
    fn get(&self) -> Result<Option<AuthToken>, ContentError>;

    fn set(&self, token: &AuthToken) -> Result<(), ContentError>;

    fn clear(&self) -> Result<(), ContentError>;
}

/// Process-local slot, for tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(AuthToken::new(token))),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<AuthToken>>, ContentError> {
        self.token
            .lock()
            .map_err(|_| ContentError::Credentials("token slot poisoned".to_string()))
    }
}

impl CredentialProvider for MemoryTokenStore {
    fn get(&self) -> Result<Option<AuthToken>, ContentError> {
        Ok(self.slot()?.clone())
    }

    fn set(&self, token: &AuthToken) -> Result<(), ContentError> {
        *self.slot()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ContentError> {
        *self.slot()? = None;
        Ok(())
    }
}
