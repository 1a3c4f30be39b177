//! Human-facing glyph and label per content kind.

use crate::core::classifier::host_of;
use crate::library::ContentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub glyph: &'static str,
    pub label: &'static str,
    /// Text of the outbound link on cards without an inline embed
    pub call_to_action: &'static str,
}

pub fn present(kind: ContentKind) -> Presentation {
    match kind {
        ContentKind::Twitter => Presentation {
            glyph: "🐦",
            label: "Twitter",
            call_to_action: "View on Twitter →",
        },
        ContentKind::YouTube => Presentation {
            glyph: "▶️",
            label: "YouTube",
            call_to_action: "Watch on YouTube →",
        },
        ContentKind::LinkedIn => Presentation {
            glyph: "💼",
            label: "LinkedIn",
            call_to_action: "View on LinkedIn →",
        },
        ContentKind::Other => Presentation {
            glyph: "🔗",
            label: "Other",
            call_to_action: "Open link →",
        },
    }
}

/// Hostname shown in a card footer; the raw link when it has none
pub fn display_host(link: &str) -> String {
    host_of(link).unwrap_or_else(|| link.to_string())
}
