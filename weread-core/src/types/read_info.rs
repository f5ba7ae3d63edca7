//! Reading progress for one book

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the reader has marked the book as finished
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    Reading,
    Finished,
}

/// Fresh snapshot of reading progress; never cached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadInfo {
    pub book_id: String,

    /// 0 to 100
    pub progress_percent: u8,

    pub last_read_at: Option<DateTime<Utc>>,

    /// Total reading time in seconds
    pub reading_duration_secs: u64,

    pub status: ReadingStatus,

    pub finished_at: Option<DateTime<Utc>>,
}
