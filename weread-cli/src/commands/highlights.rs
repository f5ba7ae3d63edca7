//! Highlights command implementation

use super::print_json;
use anyhow::Result;
use weread_core::WereadTools;

/// Render highlights as markdown grouped by chapter
pub async fn highlights(
    tools: &WereadTools,
    book_id: &str,
    max: Option<i64>,
    json: bool,
) -> Result<()> {
    let markdown = tools.format_highlights(book_id, max).await?;
    if json {
        return print_json(&serde_json::json!({ "markdown": markdown }));
    }
    print!("{}", markdown);
    Ok(())
}
