//! GitHub-backed remote candidates.
//!
//! [`GitHubTypeahead`] wires a [`MatchEngine`] to two debounced search
//! sources over one [`SearchClient`]: user logins and repository names.
//! Keystrokes go through [`input`](GitHubTypeahead::input), which updates
//! the engine synchronously and schedules the remote fetch; completed
//! fetches flow back into the engine through the orchestrator subscriber.
//!
//! Requires a tokio runtime: the debounce timer and the fetch fan-out are
//! spawned tasks.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use typeahead_net::orchestrator::{SearchOrchestrator, Suggestion};
use typeahead_net::search::{Pagination, SearchClient, SearchResults};

use crate::candidate::Candidate;
use crate::engine::{Direction, ErrorIndicator, MatchEngine};

/// Page size requested from each source and the engine's suggestion cap.
pub const SUGGESTION_LIMIT: usize = 50;

/// A match engine fed by debounced GitHub user and repository searches.
///
/// Suggestions arrive in source order, users before repositories, and the
/// engine re-sorts the filtered set lexicographically by label.
pub struct GitHubTypeahead {
    engine: Arc<Mutex<MatchEngine>>,
    orchestrator: SearchOrchestrator,
}

impl GitHubTypeahead {
    /// Build a type-ahead over the given search client.
    pub fn new(client: SearchClient) -> Self {
        let engine = Arc::new(Mutex::new(
            MatchEngine::new()
                .with_min_chars(typeahead_net::orchestrator::DEFAULT_MIN_CHARS)
                .with_max_suggestions(SUGGESTION_LIMIT)
                .with_comparator(|a: &Candidate, b: &Candidate| -> Ordering {
                    a.label.cmp(&b.label)
                }),
        ));

        let sink = Arc::clone(&engine);
        let orchestrator = SearchOrchestrator::new()
            .with_source(user_source(client.clone()))
            .with_source(repo_source(client))
            .on_update(Arc::new(move |snapshot| {
                let mut engine = sink.lock();
                engine.set_loading(snapshot.loading);
                engine.set_error(snapshot.error.clone().map(ErrorIndicator::Message));
                engine.set_candidates(
                    snapshot.suggestions.iter().map(to_candidate).collect(),
                );
            }));

        Self {
            engine,
            orchestrator,
        }
    }

    /// Override the debounce delay before dispatching a search.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.orchestrator = self.orchestrator.with_debounce(debounce);
        self
    }

    /// Handle a keystroke: update the engine and schedule the remote fetch.
    pub fn input(&self, text: &str) {
        // The engine lock is released before the orchestrator notifies its
        // subscriber, which takes the same lock.
        self.engine.lock().set_input(text);
        self.orchestrator.on_input(text);
    }

    /// Move the suggestion cursor.
    pub fn move_cursor(&self, direction: Direction) {
        self.engine.lock().move_cursor(direction);
    }

    /// Commit the candidate under the cursor.
    pub fn commit(&self) -> Option<Candidate> {
        self.engine.lock().commit()
    }

    /// Close the suggestion list.
    pub fn dismiss(&self) {
        self.engine.lock().dismiss();
    }

    /// The underlying engine, for rendering and custom interaction.
    pub fn engine(&self) -> Arc<Mutex<MatchEngine>> {
        Arc::clone(&self.engine)
    }

    /// The underlying orchestrator.
    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }
}

impl std::fmt::Debug for GitHubTypeahead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubTypeahead")
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}

/// User logins, matched in the login field.
fn user_source(client: SearchClient) -> typeahead_net::orchestrator::SearchSource {
    Arc::new(move |query: String| {
        let client = client.clone();
        Box::pin(async move {
            let results = client
                .search_users(query)
                .qualifier("in", "login")
                .pagination(Pagination::per_page(SUGGESTION_LIMIT as u32))
                .send()
                .await?;
            Ok(user_suggestions(&results))
        })
    })
}

/// Repository names, restricted to public, non-fork, non-archived repos.
fn repo_source(client: SearchClient) -> typeahead_net::orchestrator::SearchSource {
    Arc::new(move |query: String| {
        let client = client.clone();
        Box::pin(async move {
            let results = client
                .search_repositories(query)
                .qualifier("in", "name")
                .qualifier("is", "public")
                .qualifier("fork", false)
                .qualifier("archived", false)
                .pagination(Pagination::per_page(SUGGESTION_LIMIT as u32))
                .send()
                .await?;
            Ok(repo_suggestions(&results))
        })
    })
}

fn user_suggestions(results: &SearchResults<typeahead_net::search::UserItem>) -> Vec<Suggestion> {
    results
        .items
        .iter()
        .map(|user| {
            Suggestion::new(&user.login)
                .with_secondary(&user.account_type)
                .with_key(&user.html_url)
        })
        .collect()
}

fn repo_suggestions(results: &SearchResults<typeahead_net::search::RepoItem>) -> Vec<Suggestion> {
    results
        .items
        .iter()
        .map(|repo| {
            Suggestion::new(&repo.name)
                .with_secondary(&repo.full_name)
                .with_key(&repo.html_url)
        })
        .collect()
}

fn to_candidate(suggestion: &Suggestion) -> Candidate {
    let mut candidate = Candidate::new(&suggestion.label);
    if let Some(secondary) = &suggestion.label_secondary {
        candidate = candidate.with_secondary(secondary);
    }
    if let Some(key) = &suggestion.key {
        candidate = candidate.with_key(key);
    }
    candidate
}
