//! Error types for WeRead Core
//!
//! Every failure that leaves the session client is exactly one of five kinds.
//! Callers decide on retries from the kind alone.

use thiserror::Error;

/// Result type alias using WereadError
pub type Result<T> = std::result::Result<T, WereadError>;

/// Longest raw payload excerpt carried inside a parse error
const RAW_EXCERPT_CHARS: usize = 200;

/// Top-level error type for all WeRead operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WereadError {
    /// Bad caller input; no request was made
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Credential missing or rejected by the provider
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The requested entity does not exist on the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure, timeout or rate limiting
    #[error("Temporary failure: {0}")]
    Transient(String),

    /// The provider answered with a payload we could not decode
    #[error("Unexpected response from {context}: {message}")]
    Parse { context: String, message: String },
}

impl WereadError {
    /// Machine-readable kind string used by the invocation layers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Auth(_) => "auth_error",
            Self::NotFound(_) => "not_found",
            Self::Transient(_) => "transient_error",
            Self::Parse { .. } => "parse_error",
        }
    }

    /// Only transient failures are worth retrying with the same credential
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Build a parse error, keeping a bounded excerpt of the raw payload
    pub fn parse(context: impl Into<String>, message: impl std::fmt::Display, raw: &str) -> Self {
        let context = context.into();
        let excerpt = excerpt(raw);
        tracing::warn!(%context, raw = %excerpt, "provider payload did not match expected shape");
        Self::Parse {
            context,
            message: if excerpt.is_empty() {
                message.to_string()
            } else {
                format!("{message} (body: {excerpt})")
            },
        }
    }
}

impl From<reqwest::Error> for WereadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Parse {
                context: endpoint_of(&err),
                message: err.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return classify_status(status.as_u16(), &err.to_string());
        }
        // Timeouts, connect and body errors all land here
        Self::Transient(err.to_string())
    }
}

fn endpoint_of(err: &reqwest::Error) -> String {
    err.url()
        .map(|u| u.path().to_string())
        .unwrap_or_else(|| "provider".to_string())
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= RAW_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(RAW_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}

/// Provider error codes meaning the session is no longer valid
const AUTH_ERROR_CODES: &[i64] = &[-2010, -2012, -2013];

/// Provider error codes meaning the id is unknown
const NOT_FOUND_ERROR_CODES: &[i64] = &[-2001, -2003];

/// Classify a provider-level `errcode` into one of the error kinds
pub fn classify_error_code(code: i64, message: &str, context: &str) -> WereadError {
    if AUTH_ERROR_CODES.contains(&code) {
        WereadError::Auth(format!("{message} (errcode {code})"))
    } else if NOT_FOUND_ERROR_CODES.contains(&code) {
        WereadError::NotFound(format!("{context}: {message} (errcode {code})"))
    } else {
        WereadError::Parse {
            context: context.to_string(),
            message: format!("provider error {code}: {message}"),
        }
    }
}

/// Classify a non-success HTTP status whose body carried no error code
pub fn classify_status(status: u16, detail: &str) -> WereadError {
    match status {
        401 | 403 => WereadError::Auth(format!("session rejected (HTTP {status})")),
        404 => WereadError::NotFound(format!("HTTP 404: {detail}")),
        408 | 429 => WereadError::Transient(format!("HTTP {status}: {detail}")),
        500..=599 => WereadError::Transient(format!("provider unavailable (HTTP {status})")),
        _ => WereadError::Parse {
            context: format!("HTTP {status}"),
            message: detail.to_string(),
        },
    }
}
