//! Chapter type representing one entry of a book's table of contents

use serde::{Deserialize, Serialize};

/// A chapter, in reading order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Provider chapter id, referenced by highlights and notes
    pub chapter_uid: u64,

    pub book_id: String,

    pub title: String,

    /// Position in reading order
    pub index: u32,

    /// Nesting depth in the table of contents (1 = top level)
    pub level: u32,
}
