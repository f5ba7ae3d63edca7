//! Raw provider payloads and their conversion into domain records.
//!
//! The provider is loose about types: ids and counters come as strings or
//! numbers, flags as booleans or 0/1. Everything is decoded into `Scalar`
//! first and checked here, so nothing loosely typed leaves this module.

use super::text::plain_text;
use crate::error::{classify_error_code, classify_status, Result, WereadError};
use crate::types::{
    Book, BookMetadata, Chapter, Highlight, ReadInfo, ReadingStatus, Review, ReviewKind,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A JSON scalar of uncertain type
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub(crate) fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(*f as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !matches!(s.trim(), "" | "0" | "false"),
            other => other.as_i64().is_some_and(|n| n != 0),
        }
    }
}

fn text_of(value: &Option<Scalar>) -> Option<String> {
    value
        .as_ref()
        .map(Scalar::to_text)
        .filter(|s| !s.is_empty())
}

fn int_of(value: &Option<Scalar>) -> Option<i64> {
    value.as_ref().and_then(Scalar::as_i64)
}

fn count_of(value: &Option<Scalar>) -> Option<u32> {
    int_of(value).and_then(|n| u32::try_from(n).ok())
}

fn timestamp_of(value: &Option<Scalar>) -> Option<DateTime<Utc>> {
    int_of(value)
        .filter(|secs| *secs > 0)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

/// Small cover images are upgraded to the large variant
fn large_cover(url: &str) -> String {
    url.replace("/s_", "/t7_")
}

// ---------------------------------------------------------------------------
// Envelope handling
// ---------------------------------------------------------------------------

/// `{"errcode": -2012, "errmsg": "..."}`, spelled either way
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default, rename = "errcode", alias = "errCode")]
    code: Option<Scalar>,
    #[serde(default, rename = "errmsg", alias = "errMsg")]
    message: Option<String>,
}

/// Decode a response body, classifying provider failures first.
pub(crate) fn decode_body<T: DeserializeOwned>(context: &str, status: u16, body: &str) -> Result<T> {
    let success = (200..300).contains(&status);
    if status == 401 || status == 403 {
        return Err(classify_status(status, body));
    }

    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        if trimmed.to_lowercase().contains("login") {
            return Err(WereadError::Auth(format!(
                "{context}: provider redirected to the login page"
            )));
        }
        if !success {
            return Err(classify_status(status, context));
        }
        return Err(WereadError::parse(context, "expected JSON, got HTML", body));
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if success => return Err(WereadError::parse(context, e, body)),
        Err(_) => return Err(classify_status(status, context)),
    };

    if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(value.clone()) {
        if let Some(code) = int_of(&envelope.code).filter(|code| *code != 0) {
            let message = envelope.message.unwrap_or_default();
            return Err(classify_error_code(code, &message, context));
        }
    }

    if !success {
        return Err(classify_status(status, context));
    }

    serde_json::from_value(value).map_err(|e| WereadError::parse(context, e, body))
}

// ---------------------------------------------------------------------------
// Shelf and book detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotebookPage {
    #[serde(default)]
    pub books: Vec<RawShelfEntry>,
    #[serde(default)]
    pub has_more: Option<Scalar>,
}

impl NotebookPage {
    /// `None` when the provider did not say
    pub(crate) fn has_more(&self) -> Option<bool> {
        self.has_more.as_ref().map(Scalar::is_truthy)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawShelfEntry {
    #[serde(default)]
    book_id: Option<Scalar>,
    #[serde(default)]
    book: Option<RawBook>,
    #[serde(default)]
    note_count: Option<Scalar>,
    #[serde(default)]
    bookmark_count: Option<Scalar>,
    #[serde(default)]
    review_count: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBook {
    #[serde(default)]
    book_id: Option<Scalar>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    new_rating: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default)]
    title: Option<String>,
}

impl RawBook {
    pub(crate) fn id(&self) -> Option<String> {
        text_of(&self.book_id)
    }

    pub(crate) fn into_book(self, fallback_id: Option<String>) -> Result<Book> {
        let id = self.id().or(fallback_id).ok_or_else(|| WereadError::Parse {
            context: "book".to_string(),
            message: "book entry without bookId".to_string(),
        })?;
        let title = self
            .title
            .as_deref()
            .map(plain_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WereadError::Parse {
                context: "book".to_string(),
                message: format!("book {id} has no title"),
            })?;

        let categories: Vec<String> = self
            .categories
            .into_iter()
            .filter_map(|c| c.title)
            .filter(|t| !t.is_empty())
            .collect();
        let category = self
            .category
            .filter(|c| !c.is_empty())
            .or_else(|| categories.first().cloned());

        Ok(Book {
            id,
            title,
            author: self.author.as_deref().map(plain_text).unwrap_or_default(),
            cover_url: self.cover.as_deref().map(large_cover).unwrap_or_default(),
            category,
            metadata: BookMetadata {
                isbn: self.isbn.filter(|s| !s.is_empty()),
                publisher: self.publisher.filter(|s| !s.is_empty()),
                intro: self.intro.as_deref().map(plain_text).filter(|s| !s.is_empty()),
                rating: self
                    .new_rating
                    .as_ref()
                    .and_then(Scalar::as_f64)
                    .filter(|r| *r > 0.0)
                    .map(|r| r / 1000.0),
                categories,
                ..BookMetadata::default()
            },
        })
    }
}

impl RawShelfEntry {
    pub(crate) fn into_book(self) -> Result<Book> {
        let raw = self.book.ok_or_else(|| WereadError::Parse {
            context: "user/notebooks".to_string(),
            message: "shelf entry without book".to_string(),
        })?;
        let mut book = raw.into_book(text_of(&self.book_id))?;
        book.metadata.note_count = count_of(&self.note_count);
        book.metadata.bookmark_count = count_of(&self.bookmark_count);
        book.metadata.review_count = count_of(&self.review_count);
        Ok(book)
    }
}

// ---------------------------------------------------------------------------
// Chapters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterInfos {
    #[serde(default)]
    pub data: Vec<ChapterInfoBook>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterInfoBook {
    #[serde(default)]
    pub updated: Option<Vec<RawChapter>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawChapter {
    #[serde(default)]
    chapter_uid: Option<Scalar>,
    #[serde(default)]
    chapter_idx: Option<Scalar>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    level: Option<Scalar>,
}

impl RawChapter {
    /// `position` is the entry's place in the provider list
    pub(crate) fn into_chapter(self, book_id: &str, position: usize) -> Result<Chapter> {
        let chapter_uid = int_of(&self.chapter_uid)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| WereadError::Parse {
                context: "book/chapterInfos".to_string(),
                message: format!("chapter #{position} without a valid chapterUid"),
            })?;
        let index = int_of(&self.chapter_idx)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(position as u32 + 1);
        Ok(Chapter {
            chapter_uid,
            book_id: book_id.to_string(),
            title: self.title.as_deref().map(plain_text).unwrap_or_default(),
            index,
            level: int_of(&self.level)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(1),
        })
    }
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BookmarkList {
    #[serde(default)]
    pub updated: Vec<RawBookmark>,
    #[serde(default)]
    pub chapters: Vec<RawChapter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBookmark {
    #[serde(default)]
    bookmark_id: Option<Scalar>,
    #[serde(default)]
    chapter_uid: Option<Scalar>,
    #[serde(default, alias = "chapterTitle")]
    chapter_name: Option<String>,
    #[serde(default)]
    mark_text: Option<String>,
    #[serde(default)]
    create_time: Option<Scalar>,
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    style: Option<Scalar>,
    #[serde(default)]
    color_style: Option<Scalar>,
}

impl RawBookmark {
    /// Chapter title and index are joined later by the client
    pub(crate) fn into_highlight(self, book_id: &str) -> Result<Highlight> {
        let context = "book/bookmarklist";
        let id = text_of(&self.bookmark_id).ok_or_else(|| WereadError::Parse {
            context: context.to_string(),
            message: "bookmark without bookmarkId".to_string(),
        })?;
        let chapter_uid = int_of(&self.chapter_uid)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| WereadError::Parse {
                context: context.to_string(),
                message: format!("bookmark {id} without chapterUid"),
            })?;
        let created_at = timestamp_of(&self.create_time).ok_or_else(|| WereadError::Parse {
            context: context.to_string(),
            message: format!("bookmark {id} without createTime"),
        })?;
        let small = |v: &Option<Scalar>| int_of(v).and_then(|n| u8::try_from(n).ok());

        Ok(Highlight {
            id,
            book_id: book_id.to_string(),
            chapter_uid,
            chapter_title: self
                .chapter_name
                .as_deref()
                .map(plain_text)
                .filter(|t| !t.is_empty()),
            chapter_index: None,
            text: self.mark_text.as_deref().map(plain_text).unwrap_or_default(),
            created_at,
            note: None,
            range: self.range.filter(|r| !r.is_empty()),
            style: small(&self.style),
            color_style: small(&self.color_style),
        })
    }
}

// ---------------------------------------------------------------------------
// Reading progress
// ---------------------------------------------------------------------------

/// Provider marker for a finished book
const MARKED_FINISHED: i64 = 4;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReadInfo {
    #[serde(default)]
    reading_progress: Option<Scalar>,
    #[serde(default)]
    reading_time: Option<Scalar>,
    #[serde(default)]
    marked_status: Option<Scalar>,
    #[serde(default)]
    finished_date: Option<Scalar>,
    #[serde(default, alias = "readingBookDate")]
    update_time: Option<Scalar>,
}

impl RawReadInfo {
    pub(crate) fn into_read_info(self, book_id: &str) -> ReadInfo {
        let status = if int_of(&self.marked_status) == Some(MARKED_FINISHED) {
            ReadingStatus::Finished
        } else {
            ReadingStatus::Reading
        };
        ReadInfo {
            book_id: book_id.to_string(),
            progress_percent: int_of(&self.reading_progress).unwrap_or(0).clamp(0, 100) as u8,
            last_read_at: timestamp_of(&self.update_time),
            reading_duration_secs: int_of(&self.reading_time)
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(0),
            status,
            finished_at: timestamp_of(&self.finished_date),
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewList {
    #[serde(default)]
    pub reviews: Vec<RawReviewEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReviewEntry {
    #[serde(default)]
    review_id: Option<Scalar>,
    #[serde(default)]
    review: Option<RawReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReview {
    #[serde(default)]
    review_id: Option<Scalar>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "abstract")]
    quote: Option<String>,
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    chapter_uid: Option<Scalar>,
    #[serde(default)]
    create_time: Option<Scalar>,
    #[serde(default, rename = "type")]
    kind: Option<Scalar>,
    #[serde(default)]
    star: Option<Scalar>,
}

impl RawReviewEntry {
    /// `((chapter_uid, range), content)` for a passage note. Entries of any
    /// other kind, or missing a field the join needs, are skipped.
    pub(crate) fn passage_note(&self) -> Option<((u64, String), String)> {
        let review = self.review.as_ref()?;
        if ReviewKind::from_provider_type(int_of(&review.kind)?) != ReviewKind::Note {
            return None;
        }
        let chapter_uid = int_of(&review.chapter_uid).and_then(|n| u64::try_from(n).ok())?;
        let range = review.range.clone().filter(|r| !r.is_empty())?;
        let content = review.content.as_deref().map(plain_text).filter(|c| !c.is_empty())?;
        Some(((chapter_uid, range), content))
    }

    pub(crate) fn into_review(self, book_id: &str) -> Result<Review> {
        let context = "review/list";
        let review = self.review.ok_or_else(|| WereadError::Parse {
            context: context.to_string(),
            message: "review entry without review body".to_string(),
        })?;
        let id = text_of(&review.review_id)
            .or_else(|| text_of(&self.review_id))
            .ok_or_else(|| WereadError::Parse {
                context: context.to_string(),
                message: "review without reviewId".to_string(),
            })?;
        let created_at = timestamp_of(&review.create_time).ok_or_else(|| WereadError::Parse {
            context: context.to_string(),
            message: format!("review {id} without createTime"),
        })?;

        Ok(Review {
            id,
            book_id: book_id.to_string(),
            content: review.content.as_deref().map(plain_text).unwrap_or_default(),
            created_at,
            rating: int_of(&review.star)
                .filter(|n| *n > 0)
                .and_then(|n| u8::try_from(n).ok()),
            kind: ReviewKind::from_provider_type(int_of(&review.kind).unwrap_or(0)),
            quote: review.quote.as_deref().map(plain_text).filter(|q| !q.is_empty()),
            chapter_uid: int_of(&review.chapter_uid).and_then(|n| u64::try_from(n).ok()),
            range: review.range.filter(|r| !r.is_empty()),
        })
    }
}
