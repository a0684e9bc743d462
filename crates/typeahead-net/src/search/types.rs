//! Typed search response payloads.
//!
//! Field names follow the GitHub wire format. Only the fields the
//! suggestion pipeline consumes are modeled; unknown fields are ignored on
//! deserialization.

use serde::{Deserialize, Serialize};

/// Accumulated results of a (possibly multi-page) search.
///
/// `items` grows by page concatenation; `total_count` and
/// `incomplete_results` always reflect the latest page.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SearchResults<T> {
    /// Total number of matches on the server, across all pages.
    pub total_count: u64,
    /// True when the endpoint timed out and returned a partial match set.
    #[serde(default)]
    pub incomplete_results: bool,
    /// The accumulated result items.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// One user search result.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserItem {
    /// The user's login name.
    pub login: String,
    /// Numeric account id.
    pub id: u64,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
    /// Profile URL.
    #[serde(default)]
    pub html_url: String,
    /// Account type, `User` or `Organization`.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// Search relevance score.
    #[serde(default)]
    pub score: f64,
}

/// One repository search result.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepoItem {
    /// Numeric repository id.
    pub id: u64,
    /// Repository name without the owner prefix.
    pub name: String,
    /// `owner/name` form.
    #[serde(default)]
    pub full_name: String,
    /// Repository URL.
    #[serde(default)]
    pub html_url: String,
    /// Repository description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// Search relevance score.
    #[serde(default)]
    pub score: f64,
}
