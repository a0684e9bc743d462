//! Search request parameters, validation, and URL construction.
//!
//! The GitHub search endpoints accept a free-text query plus structured
//! qualifiers folded into the `q` parameter, optional `sort`/`order`, and
//! `per_page`/`page` pagination. Query validation happens here, before any
//! network activity.

use url::Url;

use crate::error::{Result, SearchError};

/// Maximum query length accepted by the search endpoints.
pub const MAX_QUERY_LEN: usize = 256;
/// Maximum number of `AND` / `OR` / `NOT` combinators in one query.
pub const COMBINATOR_LIMIT: usize = 5;
/// The endpoint never returns more than this many results for one query.
pub const RESULT_CEILING: u32 = 1000;
/// Page size applied by the endpoint when `per_page` is not sent.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Validate a search query before issuing any request.
///
/// Rejects queries longer than [`MAX_QUERY_LEN`] characters and queries
/// using more than [`COMBINATOR_LIMIT`] boolean combinators.
pub fn validate_query(query: &str) -> Result<()> {
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(SearchError::Validation(format!(
            "query can only be {MAX_QUERY_LEN} characters long"
        )));
    }
    if combinator_count(query) > COMBINATOR_LIMIT {
        return Err(SearchError::Validation(format!(
            "OR / AND / NOT can be used only {COMBINATOR_LIMIT} times"
        )));
    }
    Ok(())
}

/// Count `AND` / `OR` / `NOT` occurrences with a left-to-right,
/// non-overlapping scan. Substring matches count; the endpoint applies the
/// same rule.
fn combinator_count(query: &str) -> usize {
    const TOKENS: [&str; 3] = ["AND", "OR", "NOT"];

    let bytes = query.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match TOKENS
            .iter()
            .find(|token| bytes[i..].starts_with(token.as_bytes()))
        {
            Some(token) => {
                count += 1;
                i += token.len();
            }
            None => i += 1,
        }
    }
    count
}

/// The value of one search qualifier.
///
/// Flags render as the bare qualifier key; text and numbers render as
/// `key:value`. False flags, empty text, and zero are skipped entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QualifierValue {
    /// A presence flag, e.g. `in:login`.
    Flag(bool),
    /// A text value, e.g. `language:rust`.
    Text(String),
    /// A numeric value or range expression, e.g. `followers:>100`.
    Number(i64),
}

impl From<bool> for QualifierValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for QualifierValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QualifierValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QualifierValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// An ordered collection of search qualifiers.
///
/// Qualifiers tighten a free-text search, e.g. restricting user matches to
/// login names or excluding forked repositories. Rendering preserves
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct Qualifiers {
    entries: Vec<(String, QualifierValue)>,
}

impl Qualifiers {
    /// Create an empty qualifier set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qualifier.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<QualifierValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Add a qualifier, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QualifierValue>) -> Self {
        self.add(key, value);
        self
    }

    /// Check whether any qualifiers are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append the rendered qualifiers to a query string.
    pub(crate) fn append_to(&self, query: &mut String) {
        for (key, value) in &self.entries {
            match value {
                QualifierValue::Flag(true) => {
                    query.push(' ');
                    query.push_str(key);
                }
                QualifierValue::Text(text) if !text.is_empty() => {
                    query.push(' ');
                    query.push_str(key);
                    query.push(':');
                    query.push_str(text);
                }
                QualifierValue::Number(n) if *n != 0 => {
                    query.push(' ');
                    query.push_str(key);
                    query.push(':');
                    query.push_str(&n.to_string());
                }
                // False flags and empty values are omitted.
                _ => {}
            }
        }
    }
}

/// Pagination settings for a search request.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// Results per page. The endpoint caps this at 100.
    pub per_page: u32,
    /// Page number. The endpoint defaults to 1 when absent.
    pub page: Option<u32>,
    /// If greater than 1, this many consecutive pages are fetched and
    /// merged into one result set.
    pub fetch_multiple_pages: Option<u32>,
}

impl Pagination {
    /// Pagination with the given page size, starting from the first page.
    pub fn per_page(per_page: u32) -> Self {
        Self {
            per_page,
            page: None,
            fetch_multiple_pages: None,
        }
    }

    /// Start from a specific page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Fetch and merge this many consecutive pages.
    pub fn with_fetch_multiple_pages(mut self, pages: u32) -> Self {
        self.fetch_multiple_pages = Some(pages);
        self
    }
}

/// Sort order for search results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

impl Order {
    pub(crate) fn query_value(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A sort key accepted by a search endpoint.
///
/// Leaving the sort unset keeps the endpoint's best-match ranking.
pub trait SearchSort {
    /// The wire value sent in the `sort` query parameter.
    fn query_value(&self) -> &'static str;
}

/// Sort keys for the user search endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserSort {
    /// Sort by follower count.
    Followers,
    /// Sort by repository count.
    Repositories,
    /// Sort by account creation date.
    Joined,
}

impl SearchSort for UserSort {
    fn query_value(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Repositories => "repositories",
            Self::Joined => "joined",
        }
    }
}

/// Sort keys for the repository search endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepoSort {
    /// Sort by star count.
    Stars,
    /// Sort by fork count.
    Forks,
    /// Sort by the number of help-wanted issues.
    HelpWantedIssues,
    /// Sort by last update.
    Updated,
}

impl SearchSort for RepoSort {
    fn query_value(&self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::HelpWantedIssues => "help-wanted-issues",
            Self::Updated => "updated",
        }
    }
}

/// Build the full request URL for one page of a search.
///
/// Qualifiers fold into the `q` parameter; `sort`, `order`, `per_page`, and
/// `page` are appended only when explicitly set.
pub(crate) fn build_search_url(
    base_url: &str,
    path: &str,
    query: &str,
    qualifiers: &Qualifiers,
    sort: Option<&'static str>,
    order: Option<Order>,
    per_page: Option<u32>,
    page: Option<u32>,
) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))?;

    let mut q = query.to_string();
    qualifiers.append_to(&mut q);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", &q);
        if let Some(sort) = sort {
            pairs.append_pair("sort", sort);
        }
        if let Some(order) = order {
            pairs.append_pair("order", order.query_value());
        }
        if let Some(per_page) = per_page {
            pairs.append_pair("per_page", &per_page.to_string());
        }
        if let Some(page) = page {
            pairs.append_pair("page", &page.to_string());
        }
    }

    Ok(url)
}
