//! Debounced, multi-source search orchestration.
//!
//! The orchestrator sits between keystroke events and one or more remote
//! search sources. Every input change resets a debounce timer; when the
//! timer fires, all registered sources are queried concurrently and their
//! suggestions concatenated. The text captured at dispatch time acts as an
//! in-flight token: a completion whose token no longer matches the latest
//! input is discarded without touching displayed state.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_net::orchestrator::SearchOrchestrator;
//!
//! let orchestrator = SearchOrchestrator::new()
//!     .with_source(Arc::new(|query| Box::pin(search_somewhere(query))))
//!     .on_update(Arc::new(|snapshot| render(snapshot)));
//!
//! // From the input handler (requires a tokio runtime):
//! orchestrator.on_input("lat");
//! orchestrator.on_input("latt"); // cancels the pending dispatch for "lat"
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;

use crate::error::Result;

/// Debounce delay applied before dispatching a search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);
/// Minimum input length before a search is dispatched.
pub const DEFAULT_MIN_CHARS: usize = 3;

/// One suggestion produced by a search source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Primary display label.
    pub label: String,
    /// Secondary display label.
    pub label_secondary: Option<String>,
    /// Stable identity key; falls back to the label downstream when unset.
    pub key: Option<String>,
}

impl Suggestion {
    /// Create a suggestion with only a primary label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_secondary: None,
            key: None,
        }
    }

    /// Set the secondary label.
    pub fn with_secondary(mut self, label: impl Into<String>) -> Self {
        self.label_secondary = Some(label.into());
        self
    }

    /// Set the identity key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Future returned by a search source.
pub type SourceFuture = Pin<Box<dyn Future<Output = Result<Vec<Suggestion>>> + Send>>;

/// An asynchronous suggestion source, called with the query text.
pub type SearchSource = Arc<dyn Fn(String) -> SourceFuture + Send + Sync>;

/// Subscriber invoked after every orchestrator state change.
pub type UpdateCallback = Arc<dyn Fn(&SearchSnapshot) + Send + Sync>;

/// Observable orchestrator state.
#[derive(Clone, Debug, Default)]
pub struct SearchSnapshot {
    /// A dispatch is pending or in flight.
    pub loading: bool,
    /// The most recent fetch error, cleared on the next keystroke.
    pub error: Option<String>,
    /// Current suggestions, in source registration order.
    pub suggestions: Vec<Suggestion>,
}

struct Shared {
    /// The in-flight token: the text of the most recently dispatched query.
    current_query: Option<String>,
    loading: bool,
    error: Option<String>,
    suggestions: Vec<Suggestion>,
    /// Handle covering the debounce sleep only, never an in-flight fetch.
    pending: Option<tokio::task::JoinHandle<()>>,
}

/// Debounces input and fans queries out to the registered sources.
///
/// All state lives behind one mutex; `on_input` must be called from within
/// a tokio runtime since the debounce timer and the dispatch are spawned
/// tasks.
pub struct SearchOrchestrator {
    shared: Arc<Mutex<Shared>>,
    sources: Arc<Vec<SearchSource>>,
    subscriber: Option<UpdateCallback>,
    debounce: Duration,
    min_chars: usize,
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOrchestrator {
    /// Create an orchestrator with no sources and default timing.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                current_query: None,
                loading: false,
                error: None,
                suggestions: Vec::new(),
                pending: None,
            })),
            sources: Arc::new(Vec::new()),
            subscriber: None,
            debounce: DEFAULT_DEBOUNCE,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    /// Register a suggestion source.
    pub fn with_source(mut self, source: SearchSource) -> Self {
        Arc::make_mut(&mut self.sources).push(source);
        self
    }

    /// Set the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the minimum input length that triggers a search.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Subscribe to state changes.
    pub fn on_update(mut self, subscriber: UpdateCallback) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Get the debounce delay.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Get the minimum input length.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Get a copy of the current state.
    pub fn snapshot(&self) -> SearchSnapshot {
        let shared = self.shared.lock();
        SearchSnapshot {
            loading: shared.loading,
            error: shared.error.clone(),
            suggestions: shared.suggestions.clone(),
        }
    }

    /// Handle an input change.
    ///
    /// Cancels any pending debounce timer and clears the displayed
    /// suggestions and error. When the input meets the minimum length, the
    /// text becomes the new in-flight token and a dispatch is scheduled
    /// after the debounce delay. A timer replaced before firing never
    /// dispatches; a dispatch already in flight is left to finish and its
    /// completion is dropped by the token comparison.
    pub fn on_input(&self, text: &str) {
        let mut shared = self.shared.lock();
        if let Some(handle) = shared.pending.take() {
            handle.abort();
        }
        shared.error = None;
        shared.suggestions.clear();

        if text.chars().count() >= self.min_chars {
            shared.loading = true;
            shared.current_query = Some(text.to_string());

            let state = Arc::clone(&self.shared);
            let sources = Arc::clone(&self.sources);
            let subscriber = self.subscriber.clone();
            let query = text.to_string();
            let debounce = self.debounce;
            shared.pending = Some(tokio::spawn(async move {
                tokio::time::sleep(debounce).await;
                // Detached: replacing the debounce handle must not abort a
                // fetch that has already been dispatched.
                tokio::spawn(dispatch(state, sources, subscriber, query));
            }));
        } else {
            shared.loading = false;
            shared.current_query = None;
        }

        drop(shared);
        self.notify();
    }

    fn notify(&self) {
        if let Some(subscriber) = &self.subscriber {
            subscriber(&self.snapshot());
        }
    }
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("sources", &self.sources.len())
            .field("debounce", &self.debounce)
            .field("min_chars", &self.min_chars)
            .finish()
    }
}

/// Query every source concurrently and fold the completions into shared
/// state, unless the results have gone stale in the meantime.
async fn dispatch(
    shared: Arc<Mutex<Shared>>,
    sources: Arc<Vec<SearchSource>>,
    subscriber: Option<UpdateCallback>,
    query: String,
) {
    let results = join_all(sources.iter().map(|source| source(query.clone()))).await;

    let snapshot = {
        let mut state = shared.lock();
        if state.current_query.as_deref() != Some(query.as_str()) {
            tracing::debug!(
                target: "typeahead_net::orchestrator",
                %query,
                "discarding stale search completion"
            );
            return;
        }

        state.loading = false;
        let mut suggestions = Vec::new();
        let mut error = None;
        for result in results {
            match result {
                Ok(mut items) => suggestions.append(&mut items),
                Err(err) if error.is_none() => error = Some(err.to_string()),
                Err(_) => {}
            }
        }

        if let Some(message) = error {
            state.error = Some(message);
        } else {
            state.suggestions = suggestions;
        }

        SearchSnapshot {
            loading: state.loading,
            error: state.error.clone(),
            suggestions: state.suggestions.clone(),
        }
    };

    if let Some(subscriber) = subscriber {
        subscriber(&snapshot);
    }
}
