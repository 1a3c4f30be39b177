//! In-memory view of a user's collection.
//!
//! The store's list is authoritative: a collection is always built from a
//! full list response and replaced wholesale, never patched.

use std::collections::HashSet;

use serde::Serialize;

use super::content::{ContentId, ContentItem, ContentKind};

/// Items of one collection, in store order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<ContentItem>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list response. Repeated ids keep their first occurrence.
    pub fn from_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self { items }
    }

    /// Get an item by ID
    pub fn get(&self, id: &ContentId) -> Option<&ContentItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.iter()
    }

    /// Filter items by content kind
    pub fn filter_by_kind(&self, kind: ContentKind) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| item.kind == kind).collect()
    }

    /// Items carrying a tag (case-insensitive)
    pub fn with_tag(&self, tag: &str) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| item.tags.contains(tag)).collect()
    }

    /// Search items by query (case-insensitive substring match)
    pub fn search(&self, query: &str) -> Vec<&ContentItem> {
        let query_lower = query.to_lowercase();

        self.items
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&query_lower)
                    || item.link.to_lowercase().contains(&query_lower)
                    || item.tags.iter().any(|t| t.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Collection {
    type Item = ContentItem;
    type IntoIter = std::vec::IntoIter<ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Collection {
        Collection::from_items(vec![
            ContentItem::new("1", "Introduction to Rust", "https://youtube.com/watch?v=abc", None)
                .with_tags(["programming", "rust"]),
            ContentItem::new("2", "Launch thread", "https://x.com/team/status/42", None),
            ContentItem::new("3", "Web Development Tips", "https://example.com/article", None)
                .with_tags(["web"]),
        ])
    }

    #[test]
    fn test_collection_search() {
        let collection = sample();

        // Search by title
        assert_eq!(collection.search("rust").len(), 1);

        // Search by tag
        assert_eq!(collection.search("programming").len(), 1);

        // Search by link
        assert_eq!(collection.search("example.com").len(), 1);

        // Case insensitive
        assert_eq!(collection.search("RUST").len(), 1);

        // No match
        assert!(collection.search("python").is_empty());
    }

    #[test]
    fn test_collection_filter_by_kind() {
        let collection = sample();

        assert_eq!(collection.filter_by_kind(ContentKind::YouTube).len(), 1);
        assert_eq!(collection.filter_by_kind(ContentKind::Twitter).len(), 1);
        assert_eq!(collection.filter_by_kind(ContentKind::Other).len(), 1);
        assert!(collection.filter_by_kind(ContentKind::LinkedIn).is_empty());
    }

    #[test]
    fn test_collection_with_tag() {
        let collection = sample();
        let tagged = collection.with_tag("WEB");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id.as_str(), "3");
    }

    #[test]
    fn test_collection_drops_repeated_ids() {
        let collection = Collection::from_items(vec![
            ContentItem::new("1", "first", "https://example.com/a", None),
            ContentItem::new("1", "again", "https://example.com/b", None),
        ]);

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&ContentId::from("1")).unwrap().title, "first");
    }
}
