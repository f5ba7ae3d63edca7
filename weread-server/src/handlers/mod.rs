//! Request handlers

mod library;
mod tools;

pub use library::*;
pub use tools::*;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use weread_core::WereadError;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Error body: `{"error": {"kind", "message", "retryable"}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
}

/// A facade error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub WereadError);

impl From<WereadError> for ApiError {
    fn from(err: WereadError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            WereadError::Validation(_) => StatusCode::BAD_REQUEST,
            WereadError::Auth(_) => StatusCode::UNAUTHORIZED,
            WereadError::NotFound(_) => StatusCode::NOT_FOUND,
            WereadError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            WereadError::Parse { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(kind = self.0.kind(), "request failed: {}", self.0);
        } else {
            tracing::debug!(kind = self.0.kind(), "request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                kind: self.0.kind(),
                message: self.0.to_string(),
                retryable: self.0.is_retryable(),
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Decode an optional JSON body. A blank body is `None`; anything else must
/// parse as `T`.
pub fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError(WereadError::Validation(format!("invalid JSON body: {e}"))))
}

/// Unwrap query parameters, reporting a rejection as a validation error
pub fn query_args<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(args)| args)
        .map_err(|rejection| ApiError(WereadError::Validation(rejection.body_text())))
}
