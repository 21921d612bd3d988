//! Query execution: remote search, pagination and per-run caching.

use std::collections::HashMap;

use async_trait::async_trait;
use dashboard_api::{GitHubClient, SearchResults};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Queries fetch 100 items at a time, the search API page limit, so
/// partial results cache as whole pages.
pub const FETCH_COUNT: u32 = 100;

/// The kind of search a query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Issues and pull requests.
    Issue,
}

/// Executes search queries against a remote item store.
///
/// Widget evaluation only ever goes through this trait, so tests can
/// substitute a canned searcher and production wires in [`GitHubClient`].
#[async_trait]
pub trait ItemSearcher: Send + Sync {
    /// Fetches one page of results for a resolved query string.
    async fn search(
        &self,
        query_type: QueryType,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> dashboard_api::Result<SearchResults>;
}

#[async_trait]
impl ItemSearcher for GitHubClient {
    async fn search(
        &self,
        query_type: QueryType,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> dashboard_api::Result<SearchResults> {
        match query_type {
            QueryType::Issue => self.search_issues(query, per_page, page).await,
        }
    }
}

/// Accumulated results for one resolved query string.
#[derive(Debug, Clone)]
struct CacheEntry {
    total_count: u64,
    items: Vec<serde_json::Value>,
    /// Number of pages already fetched. Resuming a partially fetched
    /// query continues at `pages_fetched + 1`.
    pages_fetched: u32,
}

/// Cache of query results, keyed by the resolved query string.
///
/// The cache lives for one evaluation run. Two widgets whose queries
/// resolve to the same string share fetched pages, and a widget that
/// needs more items than a previous one fetched only pays for the
/// missing pages.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The outcome of running a query: the total number of matching items,
/// the first `limit` items, and a browser URL for the search.
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub total_count: u64,
    pub items: Vec<serde_json::Value>,
    pub url: String,
}

/// Runs a query, reusing cached pages and fetching more only while the
/// item count is below both `limit` and the query's total.
///
/// An uncached query always fetches at least one page, so the total
/// count is known even when `limit` is zero.
pub async fn evaluate_query(
    searcher: &dyn ItemSearcher,
    cache: &mut QueryCache,
    query_type: QueryType,
    query: &str,
    limit: usize,
) -> dashboard_api::Result<QueryResults> {
    let (mut total_count, mut items, mut pages_fetched) = match cache.entries.get(query) {
        Some(entry) => (
            Some(entry.total_count),
            entry.items.clone(),
            entry.pages_fetched,
        ),
        None => (None, Vec::new(), 0),
    };

    loop {
        if let Some(total) = total_count {
            if items.len() >= limit || items.len() as u64 >= total {
                break;
            }
        }

        let page = pages_fetched + 1;
        let results = searcher.search(query_type, query, FETCH_COUNT, page).await?;

        total_count = Some(results.total_count);
        pages_fetched = page;

        let fetched = results.items.len();
        items.extend(results.items);

        // The API can report a larger total than it will return.
        if fetched == 0 {
            break;
        }
    }

    let total_count = total_count.unwrap_or(0);

    cache.entries.insert(
        query.to_string(),
        CacheEntry {
            total_count,
            items: items.clone(),
            pages_fetched,
        },
    );

    items.truncate(limit);

    Ok(QueryResults {
        total_count,
        items,
        url: query_to_url(query),
    })
}

/// Byte set for URL query encoding, matching the web's
/// `encodeURIComponent`: everything but alphanumerics and `-_.!~*'()`
/// is percent-encoded. Spaces become `%20`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Translates a resolved query into a browser URL.
///
/// A `repo:owner/name` term is lifted out of the query and selects the
/// repository's own issue search; without one the query links to global
/// search. Whitespace runs collapse to single spaces.
pub fn query_to_url(query: &str) -> String {
    let mut repo = None;
    let mut terms = Vec::new();

    for term in query.split_whitespace() {
        match term.strip_prefix("repo:") {
            Some(name) if repo.is_none() => repo = Some(name),
            _ => terms.push(term),
        }
    }

    let encoded = utf8_percent_encode(&terms.join(" "), QUERY_ENCODE_SET).to_string();

    match repo {
        Some(repo) => format!("https://github.com/{}/issues?q={}", repo, encoded),
        None => format!("https://github.com/search?q={}", encoded),
    }
}
