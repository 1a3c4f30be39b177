//! Embed derivation for saved links.
//!
//! Turns a link into something a card can render: an iframe source for
//! platforms that allow embedding, or a plain outbound link. Everything here
//! is pure and recomputed on each render.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::library::ContentKind;

/// Canonical YouTube embed prefix
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Twitter embed widget; the tweet id goes in the `id` parameter
pub const TWITTER_EMBED_BASE: &str = "https://platform.twitter.com/embed/Tweet.html";

/// How a link should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedReference {
    /// Embeddable URL, usable as an iframe source
    Embed(String),

    /// No inline embed; render a card linking out to this URL
    LinkOut(String),
}

impl EmbedReference {
    /// Iframe source, if this reference is embeddable
    pub fn iframe_src(&self) -> Option<&str> {
        match self {
            EmbedReference::Embed(src) => Some(src),
            EmbedReference::LinkOut(_) => None,
        }
    }

    /// The URL carried by this reference
    pub fn url(&self) -> &str {
        match self {
            EmbedReference::Embed(url) | EmbedReference::LinkOut(url) => url,
        }
    }

    pub fn is_embed(&self) -> bool {
        matches!(self, EmbedReference::Embed(_))
    }
}

/// Derive the renderable form of a link.
///
/// Never fails: anything that cannot be parsed becomes a link-out to the
/// original string. Applying it to its own output yields the same output.
pub fn to_embed(url: &str, kind: ContentKind) -> EmbedReference {
    match kind {
        ContentKind::YouTube => youtube_embed(url),
        ContentKind::Twitter => twitter_embed(url),
        // LinkedIn refuses iframe embedding of posts
        ContentKind::LinkedIn | ContentKind::Other => EmbedReference::LinkOut(url.to_string()),
    }
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid video id regex"))
}

fn status_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?:^|/)status(?:es)?/(\d+)").expect("valid status regex"))
}

fn tweet_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+$").expect("valid tweet id regex"))
}

fn youtube_embed(raw: &str) -> EmbedReference {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return EmbedReference::LinkOut(raw.to_string());
    };

    match youtube_video_id(&parsed) {
        Some(id) => EmbedReference::Embed(format!("{}{}", YOUTUBE_EMBED_BASE, id)),
        // Best effort: hand the original web link to the player
        None if matches!(parsed.scheme(), "http" | "https") => {
            EmbedReference::Embed(raw.to_string())
        }
        None => EmbedReference::LinkOut(raw.to_string()),
    }
}

fn youtube_video_id(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host.contains("youtube.com") {
        let from_query = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|v| !v.is_empty());

        match from_query {
            Some(id) => Some(id),
            None => match segments.next() {
                Some("embed" | "shorts" | "live" | "v") => segments.next().map(str::to_string),
                _ => None,
            },
        }
    } else if host.contains("youtu.be") {
        segments.next().map(str::to_string)
    } else {
        None
    }?;

    video_id_pattern().is_match(&candidate).then_some(candidate)
}

fn twitter_embed(raw: &str) -> EmbedReference {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return EmbedReference::LinkOut(raw.to_string());
    };

    if let Some(id) = existing_widget_id(&parsed) {
        return EmbedReference::Embed(tweet_widget_url(&id));
    }

    let normalized_host = parsed.host_str().and_then(|host| {
        let host = host.to_ascii_lowercase();
        if host == "x.com" {
            Some("twitter.com".to_string())
        } else {
            host.strip_suffix(".x.com").map(|sub| format!("{}.twitter.com", sub))
        }
    });
    if let Some(host) = normalized_host {
        if parsed.set_host(Some(&host)).is_err() {
            return EmbedReference::LinkOut(raw.to_string());
        }
    }

    let status_id = status_pattern()
        .captures(parsed.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    match status_id {
        Some(id) => EmbedReference::Embed(tweet_widget_url(&id)),
        None => EmbedReference::LinkOut(parsed.to_string()),
    }
}

/// Tweet id of a URL that already is the embed widget
fn existing_widget_id(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?.to_ascii_lowercase();
    if host != "platform.twitter.com" || !parsed.path().starts_with("/embed/Tweet.html") {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| tweet_id_pattern().is_match(id))
}

fn tweet_widget_url(id: &str) -> String {
    format!("{}?id={}", TWITTER_EMBED_BASE, id)
}
