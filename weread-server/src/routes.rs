//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Origins allowed when `WEREAD_CORS_ORIGINS` is unset
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

fn cors_layer() -> CorsLayer {
    // WEREAD_CORS_ORIGINS can be comma-separated list of origins, or "*" for any
    let origins: Vec<HeaderValue> = match std::env::var("WEREAD_CORS_ORIGINS").ok() {
        Some(origins) if origins == "*" => {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }
        Some(origins) => origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect(),
        None => DEV_ORIGINS
            .iter()
            .map(|origin| HeaderValue::from_static(origin))
            .collect(),
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Named tool invocation
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:name", post(handlers::call_tool))
        // Library endpoints
        .route("/auth", post(handlers::authenticate))
        .route("/books", get(handlers::list_books))
        .route("/books/search", get(handlers::search_books))
        .route("/books/:id", get(handlers::get_book))
        .route("/books/:id/bookmarks", get(handlers::get_bookmarks))
        .route("/books/:id/chapters", get(handlers::get_chapters))
        .route("/books/:id/progress", get(handlers::get_read_info))
        .route("/books/:id/reviews", get(handlers::get_reviews))
        .route("/books/:id/url", get(handlers::get_web_url))
        .route("/books/:id/highlights", get(handlers::format_highlights));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
