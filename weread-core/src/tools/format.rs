//! Markdown rendering of highlights

use crate::types::{Book, Highlight};

/// Returned instead of an empty document
pub const NO_HIGHLIGHTS: &str = "No highlights found for this book.";

const UNTITLED_CHAPTER: &str = "Untitled chapter";

/// Top-level heading naming the book, or just its id when it is not on the shelf
pub fn highlights_title(book_id: &str, book: Option<&Book>) -> String {
    match book {
        Some(book) => format!("# Highlights from {} by {}", book.title, book.author),
        None => format!("# Highlights for book ID: {book_id}"),
    }
}

/// Render highlights grouped under chapter headings.
///
/// Chapters follow reading order; highlights inside a chapter stay oldest
/// first. `limit` keeps the first N highlights of that order and appends a
/// note with the number left out.
pub fn render_highlights(highlights: &[Highlight], limit: Option<usize>) -> String {
    if highlights.is_empty() {
        return NO_HIGHLIGHTS.to_string();
    }

    let mut ordered: Vec<&Highlight> = highlights.iter().collect();
    ordered.sort_by(|a, b| {
        a.chapter_order()
            .cmp(&b.chapter_order())
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = ordered.len();
    let shown = limit.map_or(total, |n| n.min(total));

    let mut blocks: Vec<String> = Vec::new();
    let mut current_chapter = None;
    for highlight in &ordered[..shown] {
        if current_chapter != Some(highlight.chapter_uid) {
            current_chapter = Some(highlight.chapter_uid);
            let title = highlight
                .chapter_title
                .as_deref()
                .unwrap_or(UNTITLED_CHAPTER);
            blocks.push(format!("## {title}"));
        }
        blocks.push(highlight_block(highlight));
    }

    if shown < total {
        blocks.push(format!("_{} more highlight(s) omitted._", total - shown));
    }

    let mut markdown = blocks.join("\n\n");
    markdown.push('\n');
    markdown
}

fn highlight_block(highlight: &Highlight) -> String {
    let mut lines: Vec<String> = highlight
        .text
        .lines()
        .map(|line| format!("> {line}").trim_end().to_string())
        .collect();
    if lines.is_empty() {
        lines.push(">".to_string());
    }

    if let Some(note) = highlight.note.as_deref().map(str::trim) {
        if !note.is_empty() {
            lines.push(format!("  - Note: {}", note.replace('\n', " ")));
        }
    }
    lines.join("\n")
}
