//! Incremental match engine for type-ahead input.
//!
//! [`MatchEngine`] owns the typed input text, the open/closed state of the
//! suggestion list, and the keyboard cursor. The visible list is derived,
//! never stored: candidates are filtered by case-insensitive prefix match,
//! sorted with an optional comparator, and limited to a maximum count — in
//! that order, so the limit applies to the already-narrowed set.
//!
//! # Example
//!
//! ```ignore
//! use typeahead::{Candidate, Direction, MatchEngine};
//!
//! let mut engine = MatchEngine::new()
//!     .with_candidates(vec![Candidate::new("apple"), Candidate::new("apricot")])
//!     .with_max_suggestions(7);
//!
//! engine.set_input("ap");
//! engine.move_cursor(Direction::Down);
//! let picked = engine.commit();
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use crate::candidate::{Candidate, PickHandler};

// ============================================================================
// Callback Types
// ============================================================================

/// Comparator applied to the filtered candidate set.
pub type Comparator = Arc<dyn Fn(&Candidate, &Candidate) -> Ordering + Send + Sync>;

/// Handler invoked whenever the input text changes.
pub type InputChangeHandler = Arc<dyn Fn(&str) + Send + Sync>;

// ============================================================================
// Presentation Types
// ============================================================================

/// Cursor movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Move the cursor toward the first row.
    Up,
    /// Move the cursor toward the last row.
    Down,
}

/// Error state shown in place of the candidate list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorIndicator {
    /// Show the generic "Error" label.
    Generic,
    /// Show a specific error message.
    Message(String),
}

/// One row of the rendered suggestion list.
///
/// Status rows replace the candidate rows entirely; error and loading
/// states take precedence over an empty result set.
#[derive(Debug)]
pub enum ListRow<'a> {
    /// Results are being fetched.
    Loading,
    /// A fetch failed; carries the display message.
    Error(&'a str),
    /// The filtered set is empty.
    NoResults,
    /// A selectable candidate.
    Candidate(&'a Candidate),
}

/// The presentation boundary: everything a renderer needs for one frame.
#[derive(Debug)]
pub struct ListView<'a> {
    /// Whether the suggestion list is open.
    pub open: bool,
    /// Cursor position within `rows`; −1 means no selection.
    pub cursor_index: i32,
    /// The rows to render, top to bottom.
    pub rows: Vec<ListRow<'a>>,
}

// ============================================================================
// Match Engine
// ============================================================================

/// Deterministic, synchronous state machine behind a type-ahead input.
///
/// The engine performs no I/O. Remote candidates arrive by the caller
/// replacing the candidate set (see `set_candidates`), typically driven by
/// a search orchestrator reacting to the input-change handler.
pub struct MatchEngine {
    /// The typed input text.
    input: String,
    /// Whether the suggestion list is open.
    open: bool,
    /// Cursor position in the visible list; −1 means no selection.
    cursor_index: i32,
    /// The full candidate set, before filtering.
    candidates: Vec<Candidate>,
    /// Comparator applied to the filtered set.
    comparator: Option<Comparator>,
    /// Maximum number of listed suggestions.
    max_suggestions: Option<usize>,
    /// Minimum input length before the list opens. Never below 1.
    min_chars: usize,
    /// Candidates are being fetched.
    loading: bool,
    /// A fetch failed.
    error: Option<ErrorIndicator>,
    /// Engine-level pick handler, between per-candidate handlers and the
    /// fill-the-input default.
    on_pick: Option<PickHandler>,
    /// Invoked after every input change.
    on_input_change: Option<InputChangeHandler>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    /// Create an engine with an empty candidate set.
    ///
    /// By default any non-empty input opens the list and the visible set
    /// is unsorted and unlimited.
    pub fn new() -> Self {
        Self {
            input: String::new(),
            open: false,
            cursor_index: -1,
            candidates: Vec::new(),
            comparator: None,
            max_suggestions: None,
            min_chars: 1,
            loading: false,
            error: None,
            on_pick: None,
            on_input_change: None,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the candidate set, builder style.
    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.set_candidates(candidates);
        self
    }

    /// Set the comparator, builder style.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Candidate, &Candidate) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self.clamp_cursor();
        self
    }

    /// Set the maximum number of listed suggestions, builder style.
    pub fn with_max_suggestions(mut self, count: usize) -> Self {
        self.set_max_suggestions(Some(count));
        self
    }

    /// Set the minimum input length, builder style.
    pub fn with_min_chars(mut self, count: usize) -> Self {
        self.set_min_chars(count);
        self
    }

    /// Set the engine-level pick handler, builder style.
    pub fn with_on_pick<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Candidate) + Send + Sync + 'static,
    {
        self.on_pick = Some(Arc::new(handler));
        self
    }

    /// Set the input-change handler, builder style.
    pub fn with_on_input_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_input_change = Some(Arc::new(handler));
        self
    }

    /// Replace the candidate set.
    ///
    /// The cursor is re-clamped into the new visible range.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.clamp_cursor();
    }

    /// Replace the comparator. Re-clamps the cursor.
    pub fn set_comparator(&mut self, comparator: Option<Comparator>) {
        self.comparator = comparator;
        self.clamp_cursor();
    }

    /// Set or clear the suggestion limit. Re-clamps the cursor.
    pub fn set_max_suggestions(&mut self, count: Option<usize>) {
        self.max_suggestions = count;
        self.clamp_cursor();
    }

    /// Set the minimum input length before the list opens.
    ///
    /// The threshold never drops below 1: an empty input always keeps the
    /// list closed.
    pub fn set_min_chars(&mut self, count: usize) {
        self.min_chars = count.max(1);
    }

    /// Set the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set or clear the error state.
    pub fn set_error(&mut self, error: Option<ErrorIndicator>) {
        self.error = error;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the suggestion list is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The cursor position; −1 means no selection.
    pub fn cursor_index(&self) -> i32 {
        self.cursor_index
    }

    /// Whether the loading flag is set.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current error state.
    pub fn error(&self) -> Option<&ErrorIndicator> {
        self.error.as_ref()
    }

    /// The full candidate set, before filtering.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Store new input text.
    ///
    /// Opens the list when the text meets the minimum length, closes it
    /// otherwise, always clears the cursor, and fires the input-change
    /// handler.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.open = self.input.chars().count() >= self.min_chars;
        self.cursor_index = -1;
        if let Some(handler) = &self.on_input_change {
            handler(&self.input);
        }
    }

    // =========================================================================
    // Visible Derivation
    // =========================================================================

    /// The derived visible candidate list: filter, then sort, then limit.
    pub fn visible(&self) -> Vec<&Candidate> {
        Self::compute_visible(
            &self.candidates,
            &self.input,
            self.comparator.as_deref(),
            self.max_suggestions,
        )
    }

    /// Pure derivation of the visible list.
    ///
    /// Filters by case-insensitive prefix match of the label against
    /// `input` (empty input matches everything), sorts the filtered subset
    /// with `comparator` when given, then truncates to `limit`. Sorting
    /// before limiting ensures the limit applies to the narrowed set.
    pub fn compute_visible<'a>(
        candidates: &'a [Candidate],
        input: &str,
        comparator: Option<&(dyn Fn(&Candidate, &Candidate) -> Ordering + Send + Sync)>,
        limit: Option<usize>,
    ) -> Vec<&'a Candidate> {
        let needle = input.to_lowercase();
        let mut visible: Vec<&Candidate> = candidates
            .iter()
            .filter(|candidate| candidate.label.to_lowercase().starts_with(&needle))
            .collect();
        if let Some(comparator) = comparator {
            visible.sort_by(|a, b| comparator(a, b));
        }
        if let Some(limit) = limit {
            visible.truncate(limit);
        }
        visible
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move the cursor one row up or down.
    ///
    /// Only effective while the list is open. The cursor clamps at either
    /// end; it does not wrap.
    pub fn move_cursor(&mut self, direction: Direction) {
        if !self.open {
            return;
        }
        let count = self.visible().len() as i32;
        if count == 0 {
            return;
        }
        let delta = match direction {
            Direction::Up => -1,
            Direction::Down => 1,
        };
        self.cursor_index = (self.cursor_index + delta).clamp(0, count - 1);
    }

    /// Place the cursor on a specific row (pointer hover).
    ///
    /// Out-of-range indices clamp into `[-1, visible_len - 1]`.
    pub fn select(&mut self, index: i32) {
        let count = self.visible().len() as i32;
        self.cursor_index = index.clamp(-1, (count - 1).max(-1));
    }

    /// Close the list and clear the cursor (focus loss or cancel key).
    pub fn dismiss(&mut self) {
        self.open = false;
        self.cursor_index = -1;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Commit the candidate under the cursor.
    ///
    /// No-op when nothing is selected. See [`commit_index`](Self::commit_index).
    pub fn commit(&mut self) -> Option<Candidate> {
        self.commit_index(self.cursor_index)
    }

    /// Commit the candidate at a specific visible index.
    ///
    /// Resolves the pick handler by priority: the candidate's own handler,
    /// then the engine-level handler, then filling the input with the
    /// label. Closes the list and clears the cursor afterward. Negative
    /// and out-of-range indices are a no-op; the list stays open.
    pub fn commit_index(&mut self, index: i32) -> Option<Candidate> {
        if index < 0 {
            return None;
        }
        let candidate = self.visible().get(index as usize).copied().cloned()?;

        if let Some(handler) = candidate.pick_handler() {
            handler(&candidate);
        } else if let Some(handler) = &self.on_pick {
            handler(&candidate);
        } else {
            self.input = candidate.label.clone();
        }

        self.open = false;
        self.cursor_index = -1;
        Some(candidate)
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Produce the rows and state a renderer needs for one frame.
    ///
    /// While loading, on error, or with an empty filtered set a single
    /// status row replaces the candidate rows. Error wins over loading,
    /// loading wins over the empty state, and an explicit error message
    /// overrides the generic "Error" label.
    pub fn view(&self) -> ListView<'_> {
        let visible = self.visible();
        let rows = if self.error.is_some() || self.loading || visible.is_empty() {
            let row = match (&self.error, self.loading) {
                (Some(ErrorIndicator::Message(message)), _) => ListRow::Error(message),
                (Some(ErrorIndicator::Generic), _) => ListRow::Error("Error"),
                (None, true) => ListRow::Loading,
                (None, false) => ListRow::NoResults,
            };
            vec![row]
        } else {
            visible.into_iter().map(ListRow::Candidate).collect()
        };

        ListView {
            open: self.open,
            cursor_index: self.cursor_index,
            rows,
        }
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible().len() as i32;
        self.cursor_index = self.cursor_index.clamp(-1, (count - 1).max(-1));
    }
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("input", &self.input)
            .field("open", &self.open)
            .field("cursor_index", &self.cursor_index)
            .field("candidate_count", &self.candidates.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn labels(visible: &[&Candidate]) -> Vec<String> {
        visible.iter().map(|c| c.label.clone()).collect()
    }

    fn engine_with(labels: &[&str]) -> MatchEngine {
        MatchEngine::new().with_candidates(labels.iter().copied().map(Candidate::new).collect())
    }

    #[test]
    fn test_prefix_filter_is_case_insensitive() {
        let mut engine = engine_with(&["Apple", "apricot", "banana"]);
        engine.set_input("AP");
        assert_eq!(labels(&engine.visible()), vec!["Apple", "apricot"]);
    }

    #[test]
    fn test_empty_input_matches_everything() {
        let engine = engine_with(&["a", "b", "c"]);
        assert_eq!(engine.visible().len(), 3);
    }

    #[test]
    fn test_filter_then_sort_then_limit() {
        let mut engine = MatchEngine::new()
            .with_candidates(
                ["a", "b", "c", "test_3", "test_1", "test_2", "test_b", "test_a"]
                    .into_iter()
                    .map(Candidate::new)
                    .collect(),
            )
            .with_comparator(|a, b| a.label.cmp(&b.label))
            .with_max_suggestions(5);

        engine.set_input("test");

        assert_eq!(
            labels(&engine.visible()),
            vec!["test_1", "test_2", "test_3", "test_a", "test_b"]
        );
    }

    #[test]
    fn test_limit_applies_after_sorting() {
        let mut engine = MatchEngine::new()
            .with_candidates(["zz", "za", "zb"].into_iter().map(Candidate::new).collect())
            .with_comparator(|a, b| a.label.cmp(&b.label))
            .with_max_suggestions(2);

        engine.set_input("z");

        // Sorted first, then limited: the lexicographically smallest two.
        assert_eq!(labels(&engine.visible()), vec!["za", "zb"]);
    }

    #[test]
    fn test_min_chars_threshold_gates_open() {
        let mut engine = engine_with(&["ABCDE"]).with_min_chars(4);

        engine.set_input("ABC");
        assert!(!engine.is_open());

        engine.set_input("ABCD");
        assert!(engine.is_open());

        // Crossing back below the threshold closes the list.
        engine.set_input("AB");
        assert!(!engine.is_open());
    }

    #[test]
    fn test_empty_input_keeps_list_closed() {
        let mut engine = engine_with(&["a"]);
        engine.set_input("");
        assert!(!engine.is_open());
    }

    #[test]
    fn test_set_input_resets_cursor() {
        let mut engine = engine_with(&["aa", "ab"]);
        engine.set_input("a");
        engine.move_cursor(Direction::Down);
        assert_eq!(engine.cursor_index(), 0);

        engine.set_input("aa");
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_cursor_clamps_without_wrapping() {
        let mut engine = engine_with(&["aa", "ab", "ac"]);
        engine.set_input("a");

        engine.move_cursor(Direction::Down);
        engine.move_cursor(Direction::Down);
        engine.move_cursor(Direction::Down);
        assert_eq!(engine.cursor_index(), 2);

        // Past the last index stays at the last index.
        engine.move_cursor(Direction::Down);
        assert_eq!(engine.cursor_index(), 2);

        engine.move_cursor(Direction::Up);
        engine.move_cursor(Direction::Up);
        assert_eq!(engine.cursor_index(), 0);

        // Above the first index stays at the first index.
        engine.move_cursor(Direction::Up);
        assert_eq!(engine.cursor_index(), 0);
    }

    #[test]
    fn test_cursor_is_inert_while_closed() {
        let mut engine = engine_with(&["aa"]);
        engine.move_cursor(Direction::Down);
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_commit_fills_input_by_default() {
        let mut engine = engine_with(&["apple", "apricot"]);
        engine.set_input("ap");
        engine.move_cursor(Direction::Down);

        let picked = engine.commit().expect("candidate picked");

        assert_eq!(picked.label, "apple");
        assert_eq!(engine.input(), "apple");
        assert!(!engine.is_open());
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_commit_without_selection_is_noop() {
        let mut engine = engine_with(&["apple"]);
        engine.set_input("ap");

        assert!(engine.commit().is_none());
        // The list stays open; nothing was picked.
        assert!(engine.is_open());
        assert_eq!(engine.input(), "ap");
    }

    #[test]
    fn test_pick_handler_priority_chain() {
        let engine_picks = std::sync::Arc::new(AtomicUsize::new(0));
        let candidate_picks = std::sync::Arc::new(AtomicUsize::new(0));

        let engine_counter = std::sync::Arc::clone(&engine_picks);
        let candidate_counter = std::sync::Arc::clone(&candidate_picks);
        let mut engine = MatchEngine::new()
            .with_candidates(vec![
                Candidate::new("own-handler").with_on_pick(move |_| {
                    candidate_counter.fetch_add(1, AtomicOrdering::SeqCst);
                }),
                Candidate::new("plain"),
            ])
            .with_on_pick(move |_| {
                engine_counter.fetch_add(1, AtomicOrdering::SeqCst);
            });

        engine.set_input("own");
        engine.commit_index(0);
        assert_eq!(candidate_picks.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(engine_picks.load(AtomicOrdering::SeqCst), 0);

        engine.set_input("plain");
        engine.commit_index(0);
        assert_eq!(engine_picks.load(AtomicOrdering::SeqCst), 1);
        // The engine-level handler suppresses the fill-input default.
        assert_eq!(engine.input(), "plain");
    }

    #[test]
    fn test_dismiss_closes_and_clears_cursor() {
        let mut engine = engine_with(&["aa"]);
        engine.set_input("a");
        engine.move_cursor(Direction::Down);

        engine.dismiss();

        assert!(!engine.is_open());
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_replacing_candidates_reclamps_cursor() {
        let mut engine = engine_with(&["aa", "ab", "ac"]);
        engine.set_input("a");
        engine.move_cursor(Direction::Down);
        engine.move_cursor(Direction::Down);
        engine.move_cursor(Direction::Down);
        assert_eq!(engine.cursor_index(), 2);

        engine.set_candidates(vec![Candidate::new("aa")]);
        assert_eq!(engine.cursor_index(), 0);

        engine.set_candidates(Vec::new());
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_select_clamps_hover_index() {
        let mut engine = engine_with(&["aa", "ab"]);
        engine.set_input("a");

        engine.select(5);
        assert_eq!(engine.cursor_index(), 1);

        engine.select(-7);
        assert_eq!(engine.cursor_index(), -1);
    }

    #[test]
    fn test_no_results_row() {
        let mut engine = engine_with(&["apple"]);
        engine.set_input("zzz");

        let view = engine.view();
        assert!(matches!(view.rows.as_slice(), [ListRow::NoResults]));
    }

    #[test]
    fn test_loading_row() {
        let mut engine = engine_with(&["apple"]);
        engine.set_input("ap");
        engine.set_loading(true);

        let view = engine.view();
        assert!(matches!(view.rows.as_slice(), [ListRow::Loading]));
    }

    #[test]
    fn test_error_takes_precedence_over_loading() {
        let mut engine = engine_with(&["apple"]);
        engine.set_input("ap");
        engine.set_loading(true);
        engine.set_error(Some(ErrorIndicator::Generic));

        let view = engine.view();
        assert!(matches!(view.rows.as_slice(), [ListRow::Error("Error")]));
    }

    #[test]
    fn test_error_message_overrides_generic_label() {
        let mut engine = engine_with(&[]);
        engine.set_error(Some(ErrorIndicator::Message("rate limited".to_string())));

        let view = engine.view();
        assert!(matches!(view.rows.as_slice(), [ListRow::Error("rate limited")]));
    }

    #[test]
    fn test_input_change_handler_fires() {
        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let mut engine = MatchEngine::new().with_on_input_change(move |text| {
            sink.lock().push(text.to_string());
        });

        engine.set_input("a");
        engine.set_input("ab");

        assert_eq!(*seen.lock(), vec!["a".to_string(), "ab".to_string()]);
    }
}
