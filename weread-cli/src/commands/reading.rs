//! Per-book reading data commands

use super::print_json;
use anyhow::Result;
use weread_core::{ReadingStatus, WereadTools};

/// List highlights, oldest first
pub async fn bookmarks(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let highlights = tools.get_book_bookmarks(book_id).await?;

    if json {
        return print_json(&highlights);
    }

    for highlight in &highlights {
        let chapter = highlight.chapter_title.as_deref().unwrap_or("?");
        println!(
            "[{}] {}: {}",
            highlight.created_at.format("%Y-%m-%d"),
            chapter,
            highlight.text
        );
        if let Some(note) = &highlight.note {
            println!("    note: {}", note);
        }
    }
    println!("{} highlight(s)", highlights.len());
    Ok(())
}

pub async fn chapters(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let chapters = tools.get_book_chapters(book_id).await?;

    if json {
        return print_json(&chapters);
    }

    for chapter in &chapters {
        let indent = "  ".repeat(chapter.level.saturating_sub(1) as usize);
        println!("{:>4}. {}{}", chapter.index, indent, chapter.title);
    }
    Ok(())
}

pub async fn progress(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let info = tools.get_book_read_info(book_id).await?;

    if json {
        return print_json(&info);
    }

    let status = match info.status {
        ReadingStatus::Reading => "reading",
        ReadingStatus::Finished => "finished",
    };
    println!("Progress:    {}%", info.progress_percent);
    println!("Status:      {}", status);
    println!("Time spent:  {} min", info.reading_duration_secs / 60);
    if let Some(at) = info.last_read_at {
        println!("Last read:   {}", at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(at) = info.finished_at {
        println!("Finished:    {}", at.format("%Y-%m-%d"));
    }
    Ok(())
}

pub async fn reviews(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let reviews = tools.get_book_reviews(book_id).await?;

    if json {
        return print_json(&reviews);
    }

    for review in &reviews {
        println!("[{}] {:?}", review.created_at.format("%Y-%m-%d"), review.kind);
        if let Some(quote) = &review.quote {
            println!("  > {}", quote);
        }
        println!("  {}", review.content);
    }
    Ok(())
}

/// Print the web reader URL; needs no session
pub fn url(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let url = tools.get_web_url(book_id)?;
    if json {
        return print_json(&serde_json::json!({ "url": url }));
    }
    println!("{}", url);
    Ok(())
}
