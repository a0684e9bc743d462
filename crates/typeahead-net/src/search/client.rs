//! Paginated search client for the GitHub search endpoints.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_net::search::{Order, Pagination, SearchClient, UserSort};
//!
//! let client = SearchClient::builder()
//!     .bearer_auth(std::env::var("GITHUB_TOKEN")?)
//!     .build();
//!
//! let results = client
//!     .search_users("octo")
//!     .qualifier("in:login", true)
//!     .sort(UserSort::Followers)
//!     .order(Order::Descending)
//!     .pagination(Pagination::per_page(50).with_fetch_multiple_pages(3))
//!     .on_page(|snapshot| println!("{} of {} so far", snapshot.items.len(), snapshot.total_count))
//!     .send()
//!     .await?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::request::{
    DEFAULT_PER_PAGE, Order, Pagination, Qualifiers, QualifierValue, RESULT_CEILING, SearchSort,
    build_search_url, validate_query,
};
use super::types::{RepoItem, SearchResults, UserItem};
use crate::error::{Result, SearchError};
use crate::merge::merge_responses;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const USER_SEARCH_PATH: &str = "/search/users";
const REPO_SEARCH_PATH: &str = "/search/repositories";
const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Observer invoked with the accumulated results after every fetched page.
pub type PageObserver<T> = Arc<dyn Fn(&SearchResults<T>) + Send + Sync>;

/// Builder for creating a [`SearchClient`].
#[derive(Debug, Default)]
pub struct SearchClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    http: Option<reqwest::Client>,
}

impl SearchClientBuilder {
    /// Override the endpoint base URL (useful for tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token sent in the `Authorization` header.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use an existing HTTP client instead of creating a new one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the search client.
    pub fn build(self) -> SearchClient {
        SearchClient {
            http: self.http.unwrap_or_default(),
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: self.token,
        }
    }
}

/// Client for the result-windowed GitHub search endpoints.
///
/// The endpoints never return more than [`RESULT_CEILING`] results for one
/// query, regardless of pagination. Cloning is cheap; the underlying HTTP
/// client is shared.
#[derive(Clone, Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchClient {
    /// Create a client against the public GitHub API without credentials.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring a search client.
    pub fn builder() -> SearchClientBuilder {
        SearchClientBuilder::default()
    }

    /// Get the endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a user search request builder.
    pub fn search_users(&self, query: impl Into<String>) -> SearchRequestBuilder<UserItem> {
        self.request(USER_SEARCH_PATH, query)
    }

    /// Create a repository search request builder.
    pub fn search_repositories(&self, query: impl Into<String>) -> SearchRequestBuilder<RepoItem> {
        self.request(REPO_SEARCH_PATH, query)
    }

    fn request<T>(&self, path: &'static str, query: impl Into<String>) -> SearchRequestBuilder<T> {
        SearchRequestBuilder {
            client: self.clone(),
            path,
            query: query.into(),
            qualifiers: Qualifiers::new(),
            sort: None,
            order: None,
            pagination: None,
            on_page: None,
            _marker: PhantomData,
        }
    }
}

/// Builder for one search operation, possibly spanning multiple pages.
pub struct SearchRequestBuilder<T> {
    client: SearchClient,
    path: &'static str,
    query: String,
    qualifiers: Qualifiers,
    sort: Option<&'static str>,
    order: Option<Order>,
    pagination: Option<Pagination>,
    on_page: Option<PageObserver<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> SearchRequestBuilder<T> {
    /// Add a qualifier to the search.
    pub fn qualifier(
        mut self,
        key: impl Into<String>,
        value: impl Into<QualifierValue>,
    ) -> Self {
        self.qualifiers.add(key, value);
        self
    }

    /// Replace the qualifier set.
    pub fn qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    /// Sort results by the given key instead of best-match ranking.
    pub fn sort(mut self, sort: impl SearchSort) -> Self {
        self.sort = Some(sort.query_value());
        self
    }

    /// Set the sort order.
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Set pagination settings.
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Observe the accumulated results after every fetched page.
    pub fn on_page<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SearchResults<T>) + Send + Sync + 'static,
    {
        self.on_page = Some(Arc::new(observer));
        self
    }

    /// Run the search and return the accumulated results.
    ///
    /// Validation failures are raised before any request is issued.
    /// Transport errors and non-2xx statuses are terminal; no page is
    /// retried. With `fetch_multiple_pages` set, consecutive pages are
    /// fetched until the requested count is reached, the server runs out of
    /// results, or the result-window ceiling is hit.
    pub async fn send(self) -> Result<SearchResults<T>> {
        validate_query(&self.query)?;

        let mut per_page = self.pagination.map(|p| p.per_page);
        let mut page = self.pagination.and_then(|p| p.page);
        let mut fetch_remaining = self.pagination.and_then(|p| p.fetch_multiple_pages);

        warn_on_ceiling(per_page, page, fetch_remaining);

        let mut accumulator = Value::Object(serde_json::Map::new());
        loop {
            let url = build_search_url(
                &self.client.base_url,
                self.path,
                &self.query,
                &self.qualifiers,
                self.sort,
                self.order,
                per_page,
                page,
            )?;

            let mut request = self
                .client
                .http
                .get(url.clone())
                .header(http::header::ACCEPT, ACCEPT_HEADER);
            if let Some(token) = &self.client.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(|err| {
                tracing::error!(target: "typeahead_net::search", %url, "search request failed: {err}");
                SearchError::from(err)
            })?;

            let status = response.status().as_u16();
            if !response.status().is_success() {
                // The endpoint reports failures as `{"message": "..."}`.
                let message = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("message")?.as_str().map(str::to_string));
                tracing::error!(
                    target: "typeahead_net::search",
                    status,
                    message = message.as_deref().unwrap_or(""),
                    "search request rejected"
                );
                return Err(SearchError::HttpStatus { status, message });
            }

            let payload: Value = response.json().await?;
            merge_responses(&mut accumulator, payload, &["items"]);

            let snapshot: SearchResults<T> = serde_json::from_value(accumulator.clone())?;
            if let Some(observer) = &self.on_page {
                observer(&snapshot);
            }

            // The result window is exhausted exactly; no further page can
            // return anything.
            if let (Some(per_page), Some(page)) = (per_page, page)
                && per_page * page == RESULT_CEILING
            {
                return Ok(snapshot);
            }

            let more_available = snapshot.total_count > snapshot.items.len() as u64;
            match (per_page, fetch_remaining) {
                (Some(current_per_page), Some(remaining)) if remaining > 1 && more_available => {
                    fetch_remaining = Some(remaining - 1);
                    let mut next_per_page = current_per_page;
                    let mut next_page = page.map_or(2, |p| p + 1);

                    // The next page would straddle the ceiling: shrink the
                    // page size to the part of the window that is left and
                    // re-aim the page index at it.
                    if next_per_page * next_page > RESULT_CEILING {
                        let remaining_window = next_per_page * next_page - RESULT_CEILING;
                        next_per_page = remaining_window;
                        next_page = RESULT_CEILING / remaining_window;
                    }

                    per_page = Some(next_per_page);
                    page = Some(next_page);
                }
                _ => return Ok(snapshot),
            }
        }
    }
}

/// Warn when the requested pagination cannot be satisfied within the
/// result-window ceiling. The fetch proceeds; the endpoint truncates.
fn warn_on_ceiling(per_page: Option<u32>, page: Option<u32>, fetch_multiple_pages: Option<u32>) {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
    let page = page.unwrap_or(1);
    // A page count of zero means the same as an unset one.
    let pages = fetch_multiple_pages.unwrap_or(1).max(1);

    if per_page * page > RESULT_CEILING
        || per_page * pages > RESULT_CEILING
        || per_page * (pages - 1 + page) > RESULT_CEILING
    {
        tracing::warn!(
            target: "typeahead_net::search",
            "the search endpoint only returns the first {RESULT_CEILING} results; the requested window will be truncated"
        );
    }
}
