//! Plain-text cards for terminal output.

use crate::core::{display_host, present, to_embed, EmbedReference};
use crate::library::{Collection, ContentItem};

/// Render one item: header, preview line, footer
pub fn render_card(item: &ContentItem) -> String {
    let presentation = present(item.kind);
    let mut lines = Vec::with_capacity(4);

    lines.push(format!("{} {}  [{}]", presentation.glyph, item.title, item.id));

    // Embed reference is derived from the link on every render
    match to_embed(&item.link, item.kind) {
        EmbedReference::Embed(src) => lines.push(format!("   embed: {}", src)),
        EmbedReference::LinkOut(href) => {
            lines.push(format!("   {} {}", presentation.call_to_action, href))
        }
    }

    let mut footer = format!("   {} · {}", presentation.label, display_host(&item.link));
    if !item.tags.is_empty() {
        let tags: Vec<String> = item.tags.iter().map(|t| format!("#{}", t)).collect();
        footer.push_str(" · ");
        footer.push_str(&tags.join(" "));
    }
    lines.push(footer);

    lines.join("\n")
}

/// Render a list of items separated by blank lines
pub fn render_cards<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> String {
    items
        .into_iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// "1 item" / "3 items"
pub fn item_count(collection: &Collection) -> String {
    match collection.len() {
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}
