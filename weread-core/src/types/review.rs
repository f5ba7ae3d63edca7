//! Reviews and passage notes written by the reader

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a review is attached to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Review of the whole book
    Summary,
    /// Note on a highlighted passage
    Note,
    Other,
}

impl ReviewKind {
    /// Map the provider's numeric review type
    pub fn from_provider_type(value: i64) -> Self {
        match value {
            4 => Self::Summary,
            1 => Self::Note,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,

    pub book_id: String,

    pub content: String,

    pub created_at: DateTime<Utc>,

    /// Star rating given with a summary review
    pub rating: Option<u8>,

    pub kind: ReviewKind,

    /// Passage the note refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_uid: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}
