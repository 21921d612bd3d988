//! HTTP client wrapper for the GitHub API.

use std::fmt;

use crate::error::{ApiError, Error, Result};
use crate::models::SearchResults;

/// Base URL for the GitHub REST API.
const BASE_URL: &str = "https://api.github.com";

/// User agent sent with every request; GitHub rejects requests without one.
const USER_AGENT: &str = concat!("issue-dashboard/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub search API.
///
/// The token is optional: unauthenticated search works, with a much lower
/// rate limit.
#[derive(Clone)]
pub struct GitHubClient {
    token: Option<String>,
    http_client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a new client with an optional API token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            http_client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Creates a client with a custom base URL (for testing).
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            token,
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the API token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches issues and pull requests.
    ///
    /// # Arguments
    /// * `query` - The search query string (already resolved, not a template)
    /// * `per_page` - Page size (the API caps this at 100)
    /// * `page` - 1-based page number
    pub async fn search_issues(
        &self,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<SearchResults> {
        let url = format!("{}/search/issues", self.base_url);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query),
                ("per_page", &per_page.to_string()),
                ("page", &page.to_string()),
            ])
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handles the HTTP response, converting failures to our error types.
    async fn handle_response(&self, response: reqwest::Response) -> Result<SearchResults> {
        let status = response.status();

        if status.is_success() {
            let body = response.json::<SearchResults>().await?;
            return Ok(body);
        }

        Err(self.parse_error_response(response).await)
    }

    /// Parses an error response into our error types.
    async fn parse_error_response(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let message = response.text().await.unwrap_or_default();

        let api_error = match status_code {
            // GitHub signals a secondary rate limit as 403 with Retry-After
            403 if retry_after.is_some() => ApiError::RateLimit { retry_after },
            401 | 403 => ApiError::Auth {
                message: if message.is_empty() {
                    "authentication failed".to_string()
                } else {
                    message
                },
            },
            404 => ApiError::NotFound {
                resource: "search endpoint".to_string(),
            },
            422 => ApiError::Validation {
                message: if message.is_empty() {
                    "unprocessable search query".to_string()
                } else {
                    message
                },
            },
            429 => ApiError::RateLimit { retry_after },
            _ => ApiError::Http {
                status: status_code,
                message: if message.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    message
                },
            },
        };

        Error::Api(api_error)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
