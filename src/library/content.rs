//! Content items as they live in a user's collection.
//!
//! Items are created by the store and never edited afterwards. The link is
//! the single source of truth: kind and embed form are derived from it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::classifier::classify;
use crate::core::error::ValidationError;

/// Identifier assigned by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Source platform of a saved link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Twitter / X post
    Twitter,

    /// YouTube video
    YouTube,

    /// LinkedIn post
    LinkedIn,

    /// Anything else
    Other,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Twitter,
        ContentKind::YouTube,
        ContentKind::LinkedIn,
        ContentKind::Other,
    ];

    /// Wire name, as sent in the `type` field
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Twitter => "twitter",
            ContentKind::YouTube => "youtube",
            ContentKind::LinkedIn => "linkedin",
            ContentKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" | "tweet" => Ok(ContentKind::Twitter),
            "youtube" | "yt" => Ok(ContentKind::YouTube),
            "linkedin" | "li" => Ok(ContentKind::LinkedIn),
            "other" | "link" | "web" => Ok(ContentKind::Other),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}

// Unknown wire values fall back to `Other` instead of failing the whole list.
impl<'de> Deserialize<'de> for ContentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(ContentKind::Other))
    }
}

/// Tag labels of one item.
///
/// Labels are trimmed and compared case-insensitively. Insertion order is
/// kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tag set, rejecting duplicates.
    ///
    /// Blank labels are skipped.
    pub fn try_from_labels<I, S>(labels: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            if !set.insert(label) {
                return Err(ValidationError::DuplicateTag(label.to_string()));
            }
        }
        Ok(set)
    }

    /// Insert a label. Returns false if an equal label is already present.
    pub fn insert(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.0.push(label.to_string());
        true
    }

    /// Case-insensitive membership test
    pub fn contains(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.0.iter().any(|t| t.to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

// Lenient: duplicates coming back from the store are dropped.
impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for label in iter {
            set.insert(label.as_ref());
        }
        set
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// A tag as the store may send it: a bare label or a tag document.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTag {
    Label(String),
    Document {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl WireTag {
    fn into_label(self) -> Option<String> {
        match self {
            WireTag::Label(label) => Some(label),
            WireTag::Document { title, name } => title.or(name),
        }
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Option::<Vec<WireTag>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(tags.into_iter().filter_map(WireTag::into_label).collect())
    }
}

/// One saved link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireItem")]
pub struct ContentItem {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: ContentId,

    /// Display title
    pub title: String,

    /// Absolute URL of the saved content
    pub link: String,

    /// Source platform
    #[serde(rename = "type")]
    pub kind: ContentKind,

    /// Tag labels
    pub tags: TagSet,
}

impl ContentItem {
    /// Create an item, deriving the kind from the link when not declared
    pub fn new(
        id: impl Into<ContentId>,
        title: impl Into<String>,
        link: impl Into<String>,
        kind: Option<ContentKind>,
    ) -> Self {
        let link = link.into();
        let kind = classify(&link, kind);
        Self {
            id: id.into(),
            title: title.into(),
            link,
            kind,
            tags: TagSet::new(),
        }
    }

    /// Add tags (duplicates are dropped)
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        for tag in tags {
            self.tags.insert(tag.as_ref());
        }
        self
    }
}

/// Item shape on the wire. `type` and `tags` are optional there.
#[derive(Deserialize)]
struct WireItem {
    #[serde(rename = "_id", alias = "id")]
    id: ContentId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<ContentKind>,
    #[serde(default)]
    tags: TagSet,
}

impl From<WireItem> for ContentItem {
    fn from(wire: WireItem) -> Self {
        let kind = classify(&wire.link, wire.kind);
        Self {
            id: wire.id,
            title: wire.title,
            link: wire.link,
            kind,
            tags: wire.tags,
        }
    }
}

/// User input for a new item, before validation
#[derive(Debug, Clone, Default)]
pub struct NewContent {
    pub title: String,
    pub link: String,
    pub kind: Option<ContentKind>,
    pub tags: Vec<String>,
}

impl NewContent {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Check the input locally and produce the create request
    pub fn validate(&self) -> Result<CreateContent, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let link = self.link.trim();
        // Url::parse only accepts absolute URLs
        if let Err(e) = url::Url::parse(link) {
            return Err(ValidationError::InvalidLink {
                link: link.to_string(),
                reason: e.to_string(),
            });
        }

        let tags = TagSet::try_from_labels(&self.tags)?;

        Ok(CreateContent {
            title: title.to_string(),
            link: link.to_string(),
            kind: classify(link, self.kind),
            tags,
        })
    }
}

/// Validated create request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateContent {
    pub title: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub tags: TagSet,
}
