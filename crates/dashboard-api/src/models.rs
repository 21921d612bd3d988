//! Data models for the search API.

use serde::Deserialize;
use serde_json::Value;

/// One page of results from the issue/PR search endpoint.
///
/// Items are kept as raw JSON: the query-table widget reads arbitrary
/// properties off them by name, so a typed model would only get in the way.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Total number of results matching the query, as reported by the
    /// server. Authoritative per page; may fluctuate between pages.
    pub total_count: u64,

    /// True when the server timed out and returned a partial result set.
    #[serde(default)]
    pub incomplete_results: bool,

    /// The items on this page. Each carries at least `number`, `title` and
    /// `html_url`.
    pub items: Vec<Value>,
}

impl SearchResults {
    /// Returns the detail-page URL of an item, if present.
    pub fn item_url(item: &Value) -> Option<&str> {
        item.get("html_url").and_then(Value::as_str)
    }
}
