//! The reading-platform operations the tool facade is built on

use crate::credential::Credential;
use crate::error::Result;
use crate::types::{Book, Chapter, Highlight, ReadInfo, Review};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a credential probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthStatus {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthStatus {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Typed access to one account on the provider.
///
/// Implementations hold no cross-call mutable state and are shared between
/// concurrent callers.
#[async_trait]
pub trait ReadingApi: Send + Sync {
    /// Probe a credential (the configured one when `None`). Never fails.
    async fn authenticate(&self, credential: Option<&Credential>) -> AuthStatus;

    /// Every book on the shelf, in provider order across pages
    async fn list_books(&self) -> Result<Vec<Book>>;

    async fn get_book_info(&self, book_id: &str) -> Result<Book>;

    /// Highlights oldest first, ties broken by id
    async fn get_bookmarks(&self, book_id: &str) -> Result<Vec<Highlight>>;

    /// Chapters in reading order
    async fn get_chapters(&self, book_id: &str) -> Result<Vec<Chapter>>;

    async fn get_read_info(&self, book_id: &str) -> Result<ReadInfo>;

    async fn get_reviews(&self, book_id: &str) -> Result<Vec<Review>>;

    /// Web reader URL; computed locally
    fn get_web_url(&self, book_id: &str) -> Result<String>;

    /// Case-insensitive substring search over title and author.
    ///
    /// The query is trimmed first; inner whitespace is kept. A blank query
    /// matches nothing and makes no request.
    async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(matching_books(self.list_books().await?, &needle))
    }
}

/// Keep books whose title or author contains `needle` (already lowercase)
pub fn matching_books(books: Vec<Book>, needle: &str) -> Vec<Book> {
    books.into_iter().filter(|b| b.matches(needle)).collect()
}
