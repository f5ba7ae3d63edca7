//! Authenticated session client for the WeRead API
//!
//! One `SessionClient` is built at startup from the configured credential and
//! shared by every tool invocation. It holds no mutable state: the HTTP
//! connection pool is internally synchronized and the credential never changes.

mod text;
mod web_url;
mod wire;

pub use text::plain_text;
pub use web_url::{encode_book_id, reader_url, validate_book_id};

use crate::api::{AuthStatus, ReadingApi};
use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{Result, WereadError};
use crate::types::{sort_chronologically, Book, Chapter, Highlight, ReadInfo, Review};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use wire::{
    BookmarkList, ChapterInfos, NotebookPage, RawBook, RawReadInfo, RawReviewEntry, ReviewList,
};

const NOTEBOOKS: &str = "user/notebooks";
const BOOK_INFO: &str = "book/info";
const BOOKMARK_LIST: &str = "book/bookmarklist";
const CHAPTER_INFOS: &str = "book/chapterInfos";
const READ_INFO: &str = "book/readinfo";
const REVIEW_LIST: &str = "review/list";

/// Client bound to a single credential
#[derive(Clone)]
pub struct SessionClient {
    http: Client,
    config: ClientConfig,
    credential: Credential,
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("api_base", &self.config.api_base)
            .field("credential", &self.credential)
            .finish()
    }
}

impl SessionClient {
    /// Build the client. No request is made; an empty credential is accepted
    /// here and rejected by every operation.
    pub fn new(config: ClientConfig, credential: Credential) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WereadError::Transient(format!("Failed to initialize HTTP client: {e}")))?;

        tracing::debug!(api_base = %config.api_base, credential = %credential, "session client ready");
        Ok(Self {
            http,
            config,
            credential,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn credential(&self) -> Result<&Credential> {
        if self.credential.is_empty() {
            Err(WereadError::Auth(
                "no credential configured; set WEREAD_COOKIE".to_string(),
            ))
        } else {
            Ok(&self.credential)
        }
    }

    fn get(&self, credential: &Credential, path: &str) -> RequestBuilder {
        self.http
            .get(self.config.api_url(path))
            .header(COOKIE, credential.header_value())
            .header(ACCEPT, "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, context: &str, request: RequestBuilder) -> Result<T> {
        tracing::debug!(endpoint = context, "provider request");
        let response = request.send().await.map_err(WereadError::from)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(WereadError::from)?;
        tracing::trace!(endpoint = context, status, bytes = body.len(), "provider response");
        wire::decode_body(context, status, &body)
    }

    async fn fetch_page(&self, credential: &Credential, offset: usize) -> Result<NotebookPage> {
        let request = self.get(credential, NOTEBOOKS).query(&[
            ("count", self.config.page_size.to_string()),
            ("offset", offset.to_string()),
        ]);
        self.send(NOTEBOOKS, request).await
    }

    async fn fetch_bookmark_list(
        &self,
        credential: &Credential,
        book_id: &str,
    ) -> Result<BookmarkList> {
        let request = self
            .get(credential, BOOKMARK_LIST)
            .query(&[("bookId", book_id)]);
        self.send(BOOKMARK_LIST, request).await
    }

    async fn fetch_review_list(
        &self,
        credential: &Credential,
        book_id: &str,
    ) -> Result<ReviewList> {
        let request = self.get(credential, REVIEW_LIST).query(&[
            ("bookId", book_id),
            ("listType", "11"),
            ("mine", "1"),
            ("syncKey", "0"),
        ]);
        self.send(REVIEW_LIST, request).await
    }

    /// Passage notes keyed by chapter and range, for attaching to highlights.
    /// A failed or malformed review list yields no notes.
    async fn passage_notes(
        &self,
        credential: &Credential,
        book_id: &str,
    ) -> HashMap<(u64, String), String> {
        match self.fetch_review_list(credential, book_id).await {
            Ok(list) => list
                .reviews
                .iter()
                .filter_map(RawReviewEntry::passage_note)
                .collect(),
            Err(e) => {
                tracing::warn!(book_id, kind = e.kind(), "skipping passage notes: {}", e);
                HashMap::new()
            }
        }
    }

    /// Highlight and review counters for the detail view; `None` when a list
    /// cannot be fetched
    async fn detail_counts(
        &self,
        credential: &Credential,
        book_id: &str,
    ) -> (Option<u32>, Option<u32>) {
        let bookmarks = match self.fetch_bookmark_list(credential, book_id).await {
            Ok(list) => u32::try_from(list.updated.len()).ok(),
            Err(e) => {
                tracing::warn!(book_id, kind = e.kind(), "no bookmark count: {}", e);
                None
            }
        };
        let reviews = match self.fetch_review_list(credential, book_id).await {
            Ok(list) => u32::try_from(list.reviews.len()).ok(),
            Err(e) => {
                tracing::warn!(book_id, kind = e.kind(), "no review count: {}", e);
                None
            }
        };
        (bookmarks, reviews)
    }
}

#[async_trait]
impl ReadingApi for SessionClient {
    async fn authenticate(&self, credential: Option<&Credential>) -> AuthStatus {
        let credential = credential.unwrap_or(&self.credential);
        if credential.is_empty() {
            return AuthStatus::invalid("missing credential");
        }

        let request = self
            .get(credential, NOTEBOOKS)
            .query(&[("count", "1"), ("offset", "0")]);
        match self.send::<NotebookPage>(NOTEBOOKS, request).await {
            Ok(_) => AuthStatus::valid(),
            Err(e) => {
                tracing::info!(credential = %credential, kind = e.kind(), "credential probe failed");
                AuthStatus::invalid(e.to_string())
            }
        }
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let credential = self.credential()?;
        let mut books = Vec::new();
        let mut seen = HashSet::new();
        let mut offset = 0usize;
        let mut largest_page = 0usize;

        for page_number in 0..self.config.max_pages {
            let page = self.fetch_page(credential, offset).await?;
            let received = page.books.len();
            if received == 0 {
                break;
            }
            let has_more = page.has_more();

            let mut fresh = 0usize;
            for entry in page.books {
                let book = entry.into_book()?;
                if seen.insert(book.id.clone()) {
                    books.push(book);
                    fresh += 1;
                }
            }
            tracing::debug!(page = page_number, received, fresh, "shelf page");

            // A short page can only be the last one
            if fresh == 0 || has_more == Some(false) || received < largest_page {
                break;
            }
            largest_page = largest_page.max(received);
            offset += received;

            if page_number + 1 == self.config.max_pages {
                tracing::warn!(
                    max_pages = self.config.max_pages,
                    "stopped shelf pagination at page limit"
                );
            }
        }

        tracing::info!(count = books.len(), "listed books");
        Ok(books)
    }

    async fn get_book_info(&self, book_id: &str) -> Result<Book> {
        validate_book_id(book_id)?;
        let credential = self.credential()?;
        let request = self.get(credential, BOOK_INFO).query(&[("bookId", book_id)]);
        let raw: RawBook = self.send(BOOK_INFO, request).await?;
        if raw.id().is_none() {
            return Err(WereadError::NotFound(format!("book {book_id}")));
        }
        let mut book = raw.into_book(None)?;

        let (bookmark_count, review_count) = self.detail_counts(credential, book_id).await;
        book.metadata.bookmark_count = bookmark_count;
        book.metadata.review_count = review_count;
        Ok(book)
    }

    async fn get_bookmarks(&self, book_id: &str) -> Result<Vec<Highlight>> {
        validate_book_id(book_id)?;
        let credential = self.credential()?;
        let list = self.fetch_bookmark_list(credential, book_id).await?;

        let mut highlights = list
            .updated
            .into_iter()
            .map(|raw| raw.into_highlight(book_id))
            .collect::<Result<Vec<_>>>()?;
        if highlights.is_empty() {
            return Ok(highlights);
        }

        // Chapters embedded in the response, keyed by uid
        let mut chapters: HashMap<u64, Chapter> = list
            .chapters
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| raw.into_chapter(book_id, i).ok())
            .map(|c| (c.chapter_uid, c))
            .collect();

        // Highlights may only carry a chapter uid; join against the chapter list
        if highlights
            .iter()
            .any(|h| !chapters.contains_key(&h.chapter_uid))
        {
            match self.get_chapters(book_id).await {
                Ok(full) => chapters.extend(full.into_iter().map(|c| (c.chapter_uid, c))),
                Err(WereadError::NotFound(reason)) => {
                    tracing::debug!(book_id, %reason, "no chapter list for book");
                }
                Err(e) => return Err(e),
            }
        }

        let notes = self.passage_notes(credential, book_id).await;
        for highlight in &mut highlights {
            if let Some(chapter) = chapters.get(&highlight.chapter_uid) {
                highlight.chapter_index = Some(chapter.index);
                if highlight.chapter_title.is_none() && !chapter.title.is_empty() {
                    highlight.chapter_title = Some(chapter.title.clone());
                }
            }
            if let Some(range) = &highlight.range {
                if let Some(note) = notes.get(&(highlight.chapter_uid, range.clone())) {
                    highlight.note = Some(note.clone());
                }
            }
        }

        sort_chronologically(&mut highlights);
        Ok(highlights)
    }

    async fn get_chapters(&self, book_id: &str) -> Result<Vec<Chapter>> {
        validate_book_id(book_id)?;
        let credential = self.credential()?;
        let body = serde_json::json!({
            "bookIds": [book_id],
            "synckeys": [0],
            "teenmode": 0,
        });
        let request = self
            .http
            .post(self.config.api_url(CHAPTER_INFOS))
            .header(COOKIE, credential.header_value())
            .json(&body);
        let infos: ChapterInfos = self.send(CHAPTER_INFOS, request).await?;

        let Some(entry) = infos.data.into_iter().next() else {
            return Err(WereadError::NotFound(format!("chapters of book {book_id}")));
        };
        let updated = entry.updated.ok_or_else(|| WereadError::Parse {
            context: CHAPTER_INFOS.to_string(),
            message: "chapter entry without `updated` list".to_string(),
        })?;

        updated
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_chapter(book_id, i))
            .collect()
    }

    async fn get_read_info(&self, book_id: &str) -> Result<ReadInfo> {
        validate_book_id(book_id)?;
        let credential = self.credential()?;
        let request = self.get(credential, READ_INFO).query(&[
            ("bookId", book_id),
            ("readingDetail", "1"),
            ("readingBookIndex", "1"),
            ("finishedDate", "1"),
        ]);
        let raw: RawReadInfo = self.send(READ_INFO, request).await?;
        Ok(raw.into_read_info(book_id))
    }

    async fn get_reviews(&self, book_id: &str) -> Result<Vec<Review>> {
        validate_book_id(book_id)?;
        let credential = self.credential()?;
        let list = self.fetch_review_list(credential, book_id).await?;
        list.reviews
            .into_iter()
            .map(|entry| entry.into_review(book_id))
            .collect()
    }

    fn get_web_url(&self, book_id: &str) -> Result<String> {
        reader_url(&self.config.web_base, book_id)
    }
}
