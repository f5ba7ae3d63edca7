//! CLI command implementations

mod auth;
mod highlights;
mod library;
mod reading;

pub use auth::auth;
pub use highlights::highlights;
pub use library::{book, books, search};
pub use reading::{bookmarks, chapters, progress, reviews, url};

use anyhow::Result;
use serde::Serialize;

/// Pretty-print any result as JSON
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
