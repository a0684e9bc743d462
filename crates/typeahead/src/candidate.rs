//! Selectable candidates for the match engine.

use std::sync::Arc;

/// Handler invoked when a candidate is picked.
pub type PickHandler = Arc<dyn Fn(&Candidate) + Send + Sync>;

/// One selectable item in the type-ahead list.
///
/// The identity key is used as the stable key for rendering and selection;
/// it falls back to the label when unset. Candidates are treated as
/// immutable once handed to the engine for a render cycle.
#[derive(Clone)]
pub struct Candidate {
    /// Primary display label; prefix matching runs against this.
    pub label: String,
    /// Secondary display label.
    pub label_secondary: Option<String>,
    key: Option<String>,
    on_pick: Option<PickHandler>,
}

impl Candidate {
    /// Create a candidate with only a primary label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_secondary: None,
            key: None,
            on_pick: None,
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

    /// Set a pick handler for this candidate only.
    ///
    /// A per-candidate handler takes precedence over the engine-level
    /// handler and over the fill-the-input default.
    pub fn with_on_pick<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Candidate) + Send + Sync + 'static,
    {
        self.on_pick = Some(Arc::new(handler));
        self
    }

    /// The stable identity key: the explicit key, or the label.
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.label)
    }

    pub(crate) fn pick_handler(&self) -> Option<&PickHandler> {
        self.on_pick.as_ref()
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("label", &self.label)
            .field("label_secondary", &self.label_secondary)
            .field("key", &self.key)
            .field("has_on_pick", &self.on_pick.is_some())
            .finish()
    }
}
