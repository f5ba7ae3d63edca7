//! Highlights (bookmarks) saved by the reader

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved excerpt of book text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub id: String,

    pub book_id: String,

    pub chapter_uid: u64,

    /// Resolved chapter title, if the chapter is known
    pub chapter_title: Option<String>,

    /// Reading-order index of the chapter, if known
    pub chapter_index: Option<u32>,

    /// Plain text of the excerpt (entities already decoded)
    pub text: String,

    pub created_at: DateTime<Utc>,

    /// Reader's note on this passage
    pub note: Option<String>,

    /// Character range inside the chapter, as "start-end"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// 0 = underline, 1 = background, 2 = wavy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_style: Option<u8>,
}

impl Highlight {
    /// Sort key placing known chapters in reading order before unknown ones
    pub fn chapter_order(&self) -> (bool, u32, u64) {
        (
            self.chapter_index.is_none(),
            self.chapter_index.unwrap_or(u32::MAX),
            self.chapter_uid,
        )
    }
}

/// Oldest first, ties broken by id
pub fn sort_chronologically(highlights: &mut [Highlight]) {
    highlights.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
