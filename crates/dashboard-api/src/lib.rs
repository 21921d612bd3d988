//! GitHub search API client for issue-dashboard.
//!
//! This crate owns the HTTP layer: a thin [`GitHubClient`] over the
//! issue/PR search endpoint, the API error taxonomy, and the raw search
//! models. Pagination, caching and query resolution live one level up in
//! `dashboard-engine`. Requests are not retried: a failed request
//! surfaces as an error and the whole run fails.

pub mod client;
pub mod error;
pub mod models;

pub use client::GitHubClient;
pub use error::{ApiError, Error, Result};
pub use models::SearchResults;
