//! Error taxonomy for content operations.
//!
//! Validation errors never reach the network. `Unauthorized` is a control
//! flow signal: the caller sends the user back to sign-in.

use thiserror::Error;

/// Generic message for failures without a server-provided one
pub const GENERIC_FAILURE: &str = "Request failed, please try again";

/// Message shown for an unknown or revoked share token
pub const INVALID_SHARE_LINK: &str = "This share link is invalid or has expired";

/// Local input errors, caught before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Link '{link}' is not a valid absolute URL: {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),

    #[error("Username and password are required")]
    EmptyCredentials,
}

/// Errors surfaced by the lifecycle, share and session controllers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Remote {
        status: u16,
        message: Option<String>,
    },

    #[error("Not found")]
    NotFound,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Credential storage error: {0}")]
    Credentials(String),
}

impl ContentError {
    /// True when the caller should clear the session and go to sign-in
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, ContentError::Unauthorized)
    }

    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            ContentError::Validation(e) => e.to_string(),
            ContentError::Unauthorized => "Your session has expired, please sign in again".to_string(),
            ContentError::Remote { message, .. } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ContentError::NotFound => INVALID_SHARE_LINK.to_string(),
            ContentError::Transport(_) => GENERIC_FAILURE.to_string(),
            ContentError::Credentials(e) => format!("Could not access the stored session: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_is_verbatim() {
        let err = ContentError::Remote {
            status: 411,
            message: Some("Link already saved".to_string()),
        };
        assert_eq!(err.user_message(), "Link already saved");
    }

    #[test]
    fn test_remote_without_message_is_generic() {
        let err = ContentError::Remote {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let blank = ContentError::Remote {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_only_unauthorized_requires_sign_in() {
        assert!(ContentError::Unauthorized.requires_sign_in());
        assert!(!ContentError::NotFound.requires_sign_in());
        assert!(!ContentError::Transport("timeout".into()).requires_sign_in());
        assert!(!ContentError::from(ValidationError::EmptyTitle).requires_sign_in());
    }

    #[test]
    fn test_transport_message_hides_details() {
        let err = ContentError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(err.to_string().contains("connection refused"));
    }
}
