//! Incremental type-ahead matching.
//!
//! The heart of the crate is [`MatchEngine`], a synchronous state machine
//! behind a type-ahead input: it filters candidates by case-insensitive
//! prefix, sorts and limits the visible set, tracks an open/closed list
//! with a clamped keyboard cursor, and resolves picks through a handler
//! priority chain. [`MatchEngine::view`] exposes everything a renderer
//! needs for one frame, including the loading, error, and no-results
//! status rows.
//!
//! With the `remote` feature, [`GitHubTypeahead`] binds an engine to
//! debounced GitHub user and repository searches from the `typeahead-net`
//! crate.
//!
//! # Example
//!
//! ```
//! use typeahead::{Candidate, Direction, MatchEngine};
//!
//! let mut engine = MatchEngine::new()
//!     .with_candidates(vec![
//!         Candidate::new("apple"),
//!         Candidate::new("apricot"),
//!         Candidate::new("banana"),
//!     ])
//!     .with_comparator(|a, b| a.label.cmp(&b.label));
//!
//! engine.set_input("ap");
//! engine.move_cursor(Direction::Down);
//! let picked = engine.commit();
//! assert_eq!(picked.map(|c| c.label), Some("apple".to_string()));
//! assert_eq!(engine.input(), "apple");
//! ```

mod candidate;
mod engine;
#[cfg(feature = "remote")]
mod remote;

pub use candidate::{Candidate, PickHandler};
pub use engine::{
    Comparator, Direction, ErrorIndicator, InputChangeHandler, ListRow, ListView, MatchEngine,
};
#[cfg(feature = "remote")]
pub use remote::{GitHubTypeahead, SUGGESTION_LIMIT};
#[cfg(feature = "remote")]
pub use typeahead_net::search::SearchClient;
