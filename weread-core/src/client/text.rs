//! Plain-text cleanup of provider strings

/// Decode HTML entities and normalize line breaks.
///
/// Text fields may arrive escaped (`&amp;`, `&#39;`) or with `<br>` line breaks.
pub fn plain_text(raw: &str) -> String {
    let with_breaks = raw
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<br>", "\n")
        .replace("\r\n", "\n");
    html_escape::decode_html_entities(&with_breaks)
        .trim()
        .to_string()
}
