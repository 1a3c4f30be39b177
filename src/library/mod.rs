//! Content items and the in-memory collection.
//!
//! A collection mirrors what the remote store returned for one owner (or
//! one share token). Nothing here is persisted locally.

pub mod collection;
pub mod content;

pub use collection::Collection;
pub use content::{ContentId, ContentItem, ContentKind, CreateContent, NewContent, TagSet};
