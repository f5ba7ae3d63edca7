//! Tool facade: one validated operation per domain concept
//!
//! Every operation checks its arguments before touching the provider and
//! otherwise passes straight through to a [`ReadingApi`]. The only logic of
//! its own is highlight formatting.

mod dispatch;
mod format;

pub use dispatch::{tool_definitions, ToolDefinition};
pub use format::{highlights_title, render_highlights, NO_HIGHLIGHTS};

use crate::api::{AuthStatus, ReadingApi};
use crate::credential::Credential;
use crate::error::{Result, WereadError};
use crate::types::{Book, Chapter, Highlight, ReadInfo, Review};
use std::sync::Arc;

/// Named operations over a shared reading API
#[derive(Clone)]
pub struct WereadTools {
    api: Arc<dyn ReadingApi>,
}

/// Arguments naming a book must be non-empty strings
fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(WereadError::Validation(format!(
            "{name} must be a non-empty string"
        )))
    } else {
        Ok(value)
    }
}

impl WereadTools {
    pub fn new(api: Arc<dyn ReadingApi>) -> Self {
        Self { api }
    }

    /// Check a credential, or the configured one when `cookie` is `None`
    pub async fn authenticate(&self, cookie: Option<&str>) -> AuthStatus {
        match cookie {
            Some(raw) => self.api.authenticate(Some(&Credential::new(raw))).await,
            None => self.api.authenticate(None).await,
        }
    }

    pub async fn get_books(&self) -> Result<Vec<Book>> {
        self.api.list_books().await
    }

    pub async fn get_book_info(&self, book_id: &str) -> Result<Book> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_book_info(book_id).await
    }

    pub async fn get_book_bookmarks(&self, book_id: &str) -> Result<Vec<Highlight>> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_bookmarks(book_id).await
    }

    pub async fn get_book_chapters(&self, book_id: &str) -> Result<Vec<Chapter>> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_chapters(book_id).await
    }

    pub async fn get_book_read_info(&self, book_id: &str) -> Result<ReadInfo> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_read_info(book_id).await
    }

    pub async fn get_book_reviews(&self, book_id: &str) -> Result<Vec<Review>> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_reviews(book_id).await
    }

    pub fn get_web_url(&self, book_id: &str) -> Result<String> {
        let book_id = require_non_empty("book_id", book_id)?;
        self.api.get_web_url(book_id)
    }

    /// Books whose title or author contains `query`, ignoring case.
    ///
    /// Surrounding whitespace is trimmed before matching, so `" foo "`
    /// searches for `foo`. A blank query yields no books rather than the
    /// whole library.
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.api.search(query).await
    }

    /// Highlights of a book as markdown, grouped by chapter under a heading
    /// naming the book. A book without highlights gets [`NO_HIGHLIGHTS`].
    pub async fn format_highlights(
        &self,
        book_id: &str,
        max_highlights: Option<i64>,
    ) -> Result<String> {
        let book_id = require_non_empty("book_id", book_id)?;
        let limit = match max_highlights {
            Some(n) if n <= 0 => {
                return Err(WereadError::Validation(format!(
                    "max_highlights must be positive, got {n}"
                )))
            }
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            None => None,
        };

        let highlights = self.api.get_bookmarks(book_id).await?;
        if highlights.is_empty() {
            return Ok(NO_HIGHLIGHTS.to_string());
        }
        tracing::debug!(book_id, count = highlights.len(), ?limit, "formatting highlights");

        let book = self.shelf_entry(book_id).await;
        let title = highlights_title(book_id, book.as_ref());
        Ok(format!("{title}\n\n{}", render_highlights(&highlights, limit)))
    }

    /// The shelf copy of a book, for titling. A shelf that cannot be listed
    /// only costs the title.
    async fn shelf_entry(&self, book_id: &str) -> Option<Book> {
        match self.api.list_books().await {
            Ok(books) => books.into_iter().find(|b| b.id == book_id),
            Err(e) => {
                tracing::warn!(book_id, kind = e.kind(), "untitled highlights: {}", e);
                None
            }
        }
    }
}
