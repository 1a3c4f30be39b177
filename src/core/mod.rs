//! Content resolution and lifecycle logic.
//!
//! This module contains:
//! - classifier / embed / presentation: pure link handling
//! - lifecycle: create / list / delete against the store
//! - share: publishing and viewing shared collections
//! - session: sign-up, sign-in, sign-out

pub mod classifier;
pub mod embed;
pub mod error;
pub mod lifecycle;
pub mod presentation;
pub mod session;
pub mod share;

// Re-export commonly used types
pub use classifier::classify;
pub use embed::{to_embed, EmbedReference};
pub use error::{ContentError, ValidationError};
pub use lifecycle::{
    AssumeYes, CollectionState, Confirm, LifecycleController, Refreshed, RemoveOutcome,
};
pub use presentation::{display_host, present, Presentation};
pub use session::SessionController;
pub use share::{share_url, Delivery, ShareController, ShareLink, SharedView};
