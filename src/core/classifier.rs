//! Content kind detection from a link's host.

use url::Url;

use crate::library::ContentKind;

/// Host fragments per kind, in match priority order
const HOST_RULES: &[(ContentKind, &[&str])] = &[
    (ContentKind::Twitter, &["twitter.com", "x.com"]),
    (ContentKind::YouTube, &["youtube.com", "youtu.be"]),
    (ContentKind::LinkedIn, &["linkedin.com"]),
];

/// Determine the content kind of a link.
///
/// A declared kind is returned unchanged. Otherwise the host is matched
/// against known platforms; anything unrecognised, including input that
/// does not parse as a URL, is [`ContentKind::Other`].
pub fn classify(url: &str, declared: Option<ContentKind>) -> ContentKind {
    if let Some(kind) = declared {
        return kind;
    }

    let Some(host) = host_of(url) else {
        return ContentKind::Other;
    };

    HOST_RULES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| host.contains(f)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ContentKind::Other)
}

/// Lowercased host of a URL, if it parses and has one
pub(crate) fn host_of(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()?
        .host_str()
        .map(|h| h.to_ascii_lowercase())
}
