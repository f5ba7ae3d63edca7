//! Book records from the shelf and the book detail endpoint

use serde::{Deserialize, Serialize};

/// A book in the account's library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Provider-assigned id, unique within the library
    pub id: String,

    pub title: String,

    pub author: String,

    /// Large cover image URL (empty when the provider has none)
    pub cover_url: String,

    /// Provider category label, e.g. "Fiction-Classics"
    pub category: Option<String>,

    /// Details only some endpoints provide
    #[serde(default)]
    pub metadata: BookMetadata,
}

/// Optional book details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,

    /// Share of positive ratings, 0.0 to 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

impl Book {
    /// Create a book with the required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            cover_url: String::new(),
            category: None,
            metadata: BookMetadata::default(),
        }
    }

    /// Case-insensitive substring match on title or author.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}
