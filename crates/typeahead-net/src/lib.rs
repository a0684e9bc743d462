//! Remote search backend for type-ahead input.
//!
//! This crate covers the network half of a type-ahead pipeline:
//!
//! - **Search client**: paginated queries against the GitHub search
//!   endpoints, with qualifier rendering, pre-flight validation, and
//!   multi-page accumulation under the 1000-result window ceiling.
//! - **Response merging**: deep merge of per-page payloads, concatenating
//!   the item arrays while overwriting bookkeeping fields.
//! - **Orchestration**: debounced dispatch over several sources at once,
//!   with stale completions dropped by an in-flight token comparison.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_net::search::{Pagination, SearchClient};
//!
//! let client = SearchClient::builder().bearer_auth(token).build();
//! let users = client
//!     .search_users("octo")
//!     .qualifier("in:login", true)
//!     .pagination(Pagination::per_page(50))
//!     .send()
//!     .await?;
//! println!("{} matches", users.total_count);
//! ```
//!
//! The match-engine half (filtering, cursor navigation, presentation rows)
//! lives in the `typeahead` crate; the two meet through
//! [`orchestrator::SearchSnapshot`].

mod error;
pub mod merge;
pub mod orchestrator;
pub mod search;

pub use error::{Result, SearchError};

// Re-export commonly used types at the crate root
pub use merge::merge_responses;
pub use orchestrator::{
    SearchOrchestrator, SearchSnapshot, SearchSource, SourceFuture, Suggestion, UpdateCallback,
};
pub use search::{
    Order, Pagination, QualifierValue, Qualifiers, RepoItem, RepoSort, SearchClient,
    SearchClientBuilder, SearchRequestBuilder, SearchResults, UserItem, UserSort,
};
