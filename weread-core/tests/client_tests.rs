//! Session client tests against a mock provider

use serde_json::{json, Value};
use std::time::Duration;
use weread_core::{
    ClientConfig, Credential, ReadingApi, ReadingStatus, ReviewKind, SessionClient, WereadError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIE: &str = "wr_vid=42; wr_skey=session-key";

fn client_for(server: &MockServer) -> SessionClient {
    client_with(server, ClientConfig::default())
}

fn client_with(server: &MockServer, config: ClientConfig) -> SessionClient {
    let config = config.with_base_url(server.uri());
    SessionClient::new(config, Credential::new(COOKIE)).expect("client")
}

fn shelf_entry(id: &str, title: &str, author: &str) -> Value {
    json!({
        "bookId": id,
        "book": { "bookId": id, "title": title, "author": author, "cover": "https://img/s_cover.jpg" }
    })
}

fn shelf_page(entries: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "books": entries }))
}

async fn mount_page(server: &MockServer, offset: &str, entries: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", offset))
        .respond_with(shelf_page(entries))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(books: &[weread_core::Book]) -> Vec<&str> {
    books.iter().map(|b| b.id.as_str()).collect()
}

// ============================================================================
// Shelf pagination
// ============================================================================

#[tokio::test]
async fn test_list_books_follows_pages_until_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", vec![shelf_entry("b1", "One", "A"), shelf_entry("b2", "Two", "B")]).await;
    mount_page(&server, "2", vec![shelf_entry("b3", "Three", "C"), shelf_entry("b4", "Four", "D")]).await;
    mount_page(&server, "4", vec![shelf_entry("b5", "Five", "E")]).await;

    let client = client_with(&server, ClientConfig::default().with_page_size(2));
    let books = client.list_books().await.unwrap();

    assert_eq!(ids(&books), vec!["b1", "b2", "b3", "b4", "b5"]);
    assert_eq!(books[0].cover_url, "https://img/t7_cover.jpg");
}

#[tokio::test]
async fn test_list_books_stops_on_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", vec![shelf_entry("b1", "One", "A"), shelf_entry("b2", "Two", "B")]).await;
    mount_page(&server, "2", vec![]).await;

    let client = client_with(&server, ClientConfig::default().with_page_size(2));
    let books = client.list_books().await.unwrap();
    assert_eq!(ids(&books), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_list_books_respects_has_more_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [shelf_entry("b1", "One", "A"), shelf_entry("b2", "Two", "B")],
            "hasMore": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", "2"))
        .respond_with(shelf_page(vec![shelf_entry("b3", "Three", "C")]))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with(&server, ClientConfig::default().with_page_size(2));
    let result = client.list_books().await.unwrap();
    assert_eq!(ids(&result), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_list_books_drops_repeated_pages() {
    let server = MockServer::start().await;
    // A provider that ignores offsets returns the same page forever
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .respond_with(shelf_page(vec![
            shelf_entry("b1", "One", "A"),
            shelf_entry("b2", "Two", "B"),
        ]))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_with(&server, ClientConfig::default().with_page_size(2));
    let books = client.list_books().await.unwrap();
    assert_eq!(ids(&books), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_list_books_auth_failure_mid_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, "0", vec![shelf_entry("b1", "One", "A"), shelf_entry("b2", "Two", "B")]).await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_with(&server, ClientConfig::default().with_page_size(2));
    let err = client.list_books().await.unwrap_err();
    assert!(matches!(err, WereadError::Auth(_)));
}

#[tokio::test]
async fn test_list_books_stops_at_page_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "0", vec![shelf_entry("b1", "One", "A")]).await;
    mount_page(&server, "1", vec![shelf_entry("b2", "Two", "B")]).await;

    let config = ClientConfig::default().with_page_size(1).with_max_pages(2);
    let client = client_with(&server, config);
    let books = client.list_books().await.unwrap();
    assert_eq!(ids(&books), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_cookie_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(header("cookie", COOKIE))
        .respond_with(shelf_page(vec![]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_expired_code_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": -2012,
            "errmsg": "login timeout"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_books().await.unwrap_err();
    assert_eq!(err.kind(), "auth_error");
}

// ============================================================================
// Authentication probe
// ============================================================================

#[tokio::test]
async fn test_authenticate_valid_and_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(header("cookie", COOKIE))
        .respond_with(shelf_page(vec![]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(header("cookie", "wr_skey=stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.authenticate(None).await.valid);

    let status = client
        .authenticate(Some(&Credential::new("wr_skey=stale")))
        .await;
    assert!(!status.valid);
    assert!(status.reason.is_some());
}

#[tokio::test]
async fn test_authenticate_empty_credential_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(shelf_page(vec![]))
        .expect(0)
        .mount(&server)
        .await;

    let status = client_for(&server)
        .authenticate(Some(&Credential::new("")))
        .await;
    assert!(!status.valid);
}

#[tokio::test]
async fn test_authenticate_network_failure_is_invalid() {
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_millis(500));
    let client = SessionClient::new(config, Credential::new(COOKIE)).unwrap();
    let status = client.authenticate(None).await;
    assert!(!status.valid);
}

// ============================================================================
// Book detail
// ============================================================================

#[tokio::test]
async fn test_get_book_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .and(query_param("bookId", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookId": "b1",
            "title": "Foo",
            "author": "Ann",
            "isbn": "9780000000001",
            "publisher": "Press",
            "category": "Fiction",
            "newRating": 900
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .and(query_param("bookId", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated": [
                { "bookmarkId": "m1", "chapterUid": 1, "markText": "x", "createTime": 1700000000 },
                { "bookmarkId": "m2", "chapterUid": 1, "markText": "y", "createTime": 1700000001 }
            ]
        })))
        .mount(&server)
        .await;
    mount_reviews(
        &server,
        json!([
            { "review": { "reviewId": "r1", "type": 1, "content": "note", "createTime": 1 } },
            { "review": { "reviewId": "r2", "type": 4, "content": "summary", "createTime": 2 } },
            { "review": { "reviewId": "r3", "type": 1, "content": "another", "createTime": 3 } }
        ]),
    )
    .await;

    let book = client_for(&server).get_book_info("b1").await.unwrap();
    assert_eq!(book.title, "Foo");
    assert_eq!(book.category.as_deref(), Some("Fiction"));
    assert_eq!(book.metadata.isbn.as_deref(), Some("9780000000001"));
    assert_eq!(book.metadata.rating, Some(0.9));
    assert_eq!(book.metadata.bookmark_count, Some(2));
    assert_eq!(book.metadata.review_count, Some(3));
}

#[tokio::test]
async fn test_get_book_info_counts_are_best_effort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookId": "b1", "title": "Foo", "author": "Ann"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_reviews(&server, json!([])).await;

    let book = client_for(&server).get_book_info("b1").await.unwrap();
    assert_eq!(book.metadata.bookmark_count, None);
    assert_eq!(book.metadata.review_count, Some(0));
}

#[tokio::test]
async fn test_get_book_info_unknown_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .and(query_param("bookId", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": -2003,
            "errmsg": "invalid bookId"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .and(query_param("bookId", "blank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_book_info("missing").await.unwrap_err();
    assert!(matches!(err, WereadError::NotFound(_)));
    let err = client.get_book_info("blank").await.unwrap_err();
    assert!(matches!(err, WereadError::NotFound(_)));
}

#[tokio::test]
async fn test_unexpected_payload_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_book_info("b1").await.unwrap_err();
    assert_eq!(err.kind(), "parse_error");
    assert!(err.to_string().contains("definitely not json"));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).get_book_info("b1").await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/readinfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "readingProgress": 10 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_timeout(Duration::from_millis(100));
    let err = client_with(&server, config)
        .get_read_info("b1")
        .await
        .unwrap_err();
    assert!(matches!(err, WereadError::Transient(_)));
}

// ============================================================================
// Highlights, chapters, progress and reviews
// ============================================================================

async fn mount_chapters(server: &MockServer, book_id: &str, chapters: Value) {
    Mock::given(method("POST"))
        .and(path("/book/chapterInfos"))
        .and(body_json(json!({
            "bookIds": [book_id],
            "synckeys": [0],
            "teenmode": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "bookId": book_id, "updated": chapters }]
        })))
        .mount(server)
        .await;
}

async fn mount_reviews(server: &MockServer, reviews: Value) {
    Mock::given(method("GET"))
        .and(path("/review/list"))
        .and(query_param("mine", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reviews": reviews })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_bookmarks_normalizes_and_sorts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .and(query_param("bookId", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated": [
                {
                    "bookmarkId": "b1_2_10-20", "bookId": "b1", "chapterUid": 2,
                    "markText": "Tom &amp; Jerry", "createTime": 1700000200, "range": "10-20"
                },
                {
                    "bookmarkId": "b1_1_5-9", "bookId": "b1", "chapterUid": "1",
                    "markText": "First", "createTime": 1700000100, "range": "5-9",
                    "style": 1, "colorStyle": 3
                },
                {
                    "bookmarkId": "b1_1_1-4", "bookId": "b1", "chapterUid": 1,
                    "markText": "Tied", "createTime": 1700000200, "range": "1-4"
                }
            ],
            "chapters": []
        })))
        .mount(&server)
        .await;
    mount_chapters(
        &server,
        "b1",
        json!([
            { "chapterUid": 1, "chapterIdx": 1, "title": "Opening", "level": 1 },
            { "chapterUid": 2, "chapterIdx": 2, "title": "Middle", "level": 1 }
        ]),
    )
    .await;
    mount_reviews(
        &server,
        json!([
            { "reviewId": "r1", "review": {
                "reviewId": "r1", "content": "my note", "abstract": "Tom & Jerry",
                "range": "10-20", "chapterUid": 2, "createTime": 1700000300, "type": 1
            }},
            { "reviewId": "r2", "review": {
                "reviewId": "r2", "content": "Great book", "createTime": 1700000400,
                "type": 4, "star": 5
            }}
        ]),
    )
    .await;

    let highlights = client_for(&server).get_bookmarks("b1").await.unwrap();
    let order: Vec<&str> = highlights.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(order, vec!["b1_1_5-9", "b1_1_1-4", "b1_2_10-20"]);

    let escaped = &highlights[2];
    assert_eq!(escaped.text, "Tom & Jerry");
    assert_eq!(escaped.chapter_title.as_deref(), Some("Middle"));
    assert_eq!(escaped.chapter_index, Some(2));
    assert_eq!(escaped.note.as_deref(), Some("my note"));

    assert_eq!(highlights[0].chapter_title.as_deref(), Some("Opening"));
    assert_eq!(highlights[0].style, Some(1));
    assert_eq!(highlights[0].color_style, Some(3));
    assert!(highlights[0].note.is_none());
}

#[tokio::test]
async fn test_get_bookmarks_uses_embedded_chapters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated": [{
                "bookmarkId": "m1", "chapterUid": 7, "markText": "x", "createTime": 1700000000
            }],
            "chapters": [{ "chapterUid": 7, "chapterIdx": 3, "title": "Seven" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/book/chapterInfos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_reviews(&server, json!([])).await;

    let highlights = client_for(&server).get_bookmarks("b1").await.unwrap();
    assert_eq!(highlights[0].chapter_title.as_deref(), Some("Seven"));
    assert_eq!(highlights[0].chapter_index, Some(3));
}

async fn mount_single_bookmark(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated": [{
                "bookmarkId": "m1", "chapterUid": 7, "markText": "kept", "createTime": 1700000000,
                "range": "1-4"
            }],
            "chapters": [{ "chapterUid": 7, "chapterIdx": 1, "title": "Seven" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_bookmarks_ignores_malformed_summary_review() {
    let server = MockServer::start().await;
    mount_single_bookmark(&server).await;
    mount_reviews(
        &server,
        json!([
            { "review": { "reviewId": "r1", "type": 1, "chapterUid": 7, "range": "1-4",
                "content": "attached", "createTime": 1700000100 } },
            { "review": { "reviewId": "r2", "type": 4, "content": "no timestamp" } }
        ]),
    )
    .await;

    let highlights = client_for(&server).get_bookmarks("b1").await.unwrap();
    assert_eq!(highlights.len(), 1);
    assert_eq!(highlights[0].note.as_deref(), Some("attached"));
}

#[tokio::test]
async fn test_get_bookmarks_survives_review_list_outage() {
    let server = MockServer::start().await;
    mount_single_bookmark(&server).await;
    Mock::given(method("GET"))
        .and(path("/review/list"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let highlights = client_for(&server).get_bookmarks("b1").await.unwrap();
    assert_eq!(highlights[0].text, "kept");
    assert!(highlights[0].note.is_none());
}

#[tokio::test]
async fn test_get_bookmarks_empty_makes_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/bookmarklist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updated": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let highlights = client_for(&server).get_bookmarks("b1").await.unwrap();
    assert!(highlights.is_empty());
}

#[tokio::test]
async fn test_get_chapters_keeps_provider_order() {
    let server = MockServer::start().await;
    mount_chapters(
        &server,
        "b1",
        json!([
            { "chapterUid": 30, "chapterIdx": 1, "title": "Preface" },
            { "chapterUid": 10, "chapterIdx": 2, "title": "Part &amp; Whole", "level": 2 },
            { "chapterUid": 20, "chapterIdx": 3, "title": "End" }
        ]),
    )
    .await;

    let chapters = client_for(&server).get_chapters("b1").await.unwrap();
    let uids: Vec<u64> = chapters.iter().map(|c| c.chapter_uid).collect();
    assert_eq!(uids, vec![30, 10, 20]);
    assert_eq!(chapters[1].title, "Part & Whole");
    assert_eq!(chapters[1].level, 2);
    assert_eq!(chapters[0].book_id, "b1");
}

#[tokio::test]
async fn test_get_chapters_unknown_book() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/book/chapterInfos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_chapters("nope").await.unwrap_err();
    assert!(matches!(err, WereadError::NotFound(_)));
}

#[tokio::test]
async fn test_get_read_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/readinfo"))
        .and(query_param("bookId", "b1"))
        .and(query_param("readingDetail", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readingProgress": 42,
            "readingTime": 5400,
            "markedStatus": 2,
            "updateTime": 1700000000
        })))
        .mount(&server)
        .await;

    let info = client_for(&server).get_read_info("b1").await.unwrap();
    assert_eq!(info.book_id, "b1");
    assert_eq!(info.progress_percent, 42);
    assert_eq!(info.reading_duration_secs, 5400);
    assert_eq!(info.status, ReadingStatus::Reading);
    assert_eq!(info.last_read_at.unwrap().timestamp(), 1700000000);
}

#[tokio::test]
async fn test_get_reviews_keeps_order_and_kinds() {
    let server = MockServer::start().await;
    mount_reviews(
        &server,
        json!([
            { "review": { "reviewId": "r2", "content": "Note", "type": 1, "createTime": 1700000500 } },
            { "review": { "reviewId": "r1", "content": "Summary", "type": 4, "createTime": 1700000100 } }
        ]),
    )
    .await;

    let reviews = client_for(&server).get_reviews("b1").await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].id, "r2");
    assert_eq!(reviews[0].kind, ReviewKind::Note);
    assert_eq!(reviews[1].kind, ReviewKind::Summary);
}

#[tokio::test]
async fn test_search_over_library() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", "0"))
        .respond_with(shelf_page(vec![
            shelf_entry("b1", "Foo", "Ann"),
            shelf_entry("b2", "Bar", "Bob"),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/notebooks"))
        .and(query_param("offset", "2"))
        .respond_with(shelf_page(vec![]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client.search("foo").await.unwrap();
    assert_eq!(ids(&found), vec!["b1"]);
    assert!(client.search("").await.unwrap().is_empty());
}
