//! brainlink - Save, classify, preview and share links to external content
//!
//! Links to tweets, videos, LinkedIn posts and anything else are kept in a
//! remote store. This crate decides what kind each link is, how it can be
//! rendered, and drives the create / list / delete / share lifecycle.
//!
//! # Modules
//!
//! - `adapters`: Remote store (REST) and clipboard integrations
//! - `auth`: Session token slot and credentials
//! - `core`: Classification, embedding, lifecycle and share controllers
//! - `library`: Content items and the in-memory collection
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! brainlink signin alice
//! brainlink add https://youtu.be/abc123 --title "Talk" --tags rust,async
//! brainlink list --kind youtube
//! brainlink share
//! ```

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{Clipboard, ContentStore, HttpStore};
pub use auth::{AuthToken, CredentialProvider, Credentials, FileTokenStore, MemoryTokenStore};
pub use crate::core::{
    classify, present, to_embed, CollectionState, ContentError, EmbedReference,
    LifecycleController, SessionController, ShareController, SharedView,
};
pub use library::{Collection, ContentId, ContentItem, ContentKind, NewContent, TagSet};
