//! GitHub search client.
//!
//! Query validation and URL construction live in [`request`], the typed
//! payloads in [`types`], and the paginated fetch loop in [`client`].

mod client;
mod request;
mod types;

pub use client::{PageObserver, SearchClient, SearchClientBuilder, SearchRequestBuilder};
pub use request::{
    COMBINATOR_LIMIT, DEFAULT_PER_PAGE, MAX_QUERY_LEN, Order, Pagination, QualifierValue,
    Qualifiers, RESULT_CEILING, RepoSort, SearchSort, UserSort, validate_query,
};
pub use types::{RepoItem, SearchResults, UserItem};
