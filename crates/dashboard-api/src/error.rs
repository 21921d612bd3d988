//! Error types for the GitHub API client.

use std::fmt;

use thiserror::Error;

/// A specialized Result type for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An error reported by the GitHub API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A transport-level error from the HTTP client.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors reported by the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication failure (bad or missing token).
    Auth { message: String },
    /// Rate limit exceeded.
    RateLimit { retry_after: Option<u64> },
    /// Resource not found.
    NotFound { resource: String },
    /// The API rejected the request (e.g. an unparseable search query).
    Validation { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "authentication failed: {}", message),
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "rate limited, retry after {} seconds", secs),
                None => write!(f, "rate limited"),
            },
            ApiError::NotFound { resource } => write!(f, "{} not found", resource),
            ApiError::Validation { message } => write!(f, "validation error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if this error is potentially transient.
    ///
    /// The dashboard run never retries; this exists so callers that own a
    /// retry policy can make the distinction.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimit { .. }
                | ApiError::Http {
                    status: 500..=599,
                    ..
                }
        )
    }
}

impl Error {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(ApiError::RateLimit { .. }) => 4,
            Error::Api(_) => 2,
            Error::Request(_) => 3,
        }
    }
}
