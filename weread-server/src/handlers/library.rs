//! Library handlers: one REST route per facade operation

use super::{json_body, query_args, ApiResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use weread_core::{AuthStatus, Book, Chapter, Highlight, ReadInfo, Review};

/// Body of `POST /auth`
#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    /// Cookie to probe instead of the configured one
    pub cookie: Option<String>,
}

/// Query parameters for searching the shelf
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Query parameters for highlight formatting
#[derive(Debug, Deserialize)]
pub struct HighlightsQuery {
    pub max: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
    pub total: usize,
}

impl From<Vec<Book>> for BooksResponse {
    fn from(books: Vec<Book>) -> Self {
        Self {
            total: books.len(),
            books,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HighlightsResponse {
    pub markdown: String,
}

/// Probe a credential. An empty body probes the configured one; a body that
/// is not an `AuthRequest` is rejected rather than ignored.
pub async fn authenticate(State(state): State<AppState>, body: Bytes) -> ApiResult<AuthStatus> {
    let request: AuthRequest = json_body(&body)?.unwrap_or_default();
    Ok(Json(state.tools.authenticate(request.cookie.as_deref()).await))
}

/// Every book on the shelf
pub async fn list_books(State(state): State<AppState>) -> ApiResult<BooksResponse> {
    let books = state.tools.get_books().await?;
    Ok(Json(books.into()))
}

/// Books whose title or author contains `q`
pub async fn search_books(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<BooksResponse> {
    let query = query_args(query)?;
    let books = state.tools.search_books(&query.q).await?;
    Ok(Json(books.into()))
}

pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Book> {
    Ok(Json(state.tools.get_book_info(&id).await?))
}

pub async fn get_bookmarks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Highlight>> {
    Ok(Json(state.tools.get_book_bookmarks(&id).await?))
}

pub async fn get_chapters(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Chapter>> {
    Ok(Json(state.tools.get_book_chapters(&id).await?))
}

pub async fn get_read_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ReadInfo> {
    Ok(Json(state.tools.get_book_read_info(&id).await?))
}

pub async fn get_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Review>> {
    Ok(Json(state.tools.get_book_reviews(&id).await?))
}

pub async fn get_web_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UrlResponse> {
    let url = state.tools.get_web_url(&id)?;
    Ok(Json(UrlResponse { url }))
}

/// Highlights as markdown; `max` caps how many are rendered
pub async fn format_highlights(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<HighlightsQuery>, QueryRejection>,
) -> ApiResult<HighlightsResponse> {
    let query = query_args(query)?;
    let markdown = state.tools.format_highlights(&id, query.max).await?;
    Ok(Json(HighlightsResponse { markdown }))
}
