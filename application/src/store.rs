//! Configuration store
//!
//! Holds the document being edited, the last persisted document, the
//! per-field error map and the undo/redo history. All operations are
//! synchronous and purely in-memory; network calls never originate here.

use thiserror::Error;
use tracing::debug;
use widgetdesk_domain::{
    ErrorMap, Field, History, WidgetConfig, WidgetConfigPatch, validate_document, validate_field,
};

/// Undo/redo attempted at a history boundary
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

/// What a call to [`ConfigStore::update`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Fields whose value changed, in declaration order
    pub changed: Vec<Field>,
    /// Field-level failures among the re-checked fields
    pub field_errors: Vec<(Field, String)>,
}

impl UpdateOutcome {
    /// Whether the update was a no-op
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// In-memory document store with undo/redo and dirty tracking
#[derive(Debug, Clone)]
pub struct ConfigStore {
    document: WidgetConfig,
    persisted: WidgetConfig,
    errors: ErrorMap,
    history: History<WidgetConfig>,
    dirty: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create a store seeded with the default document
    pub fn new() -> Self {
        let document = WidgetConfig::default();
        Self {
            history: History::new(document.clone()),
            persisted: document.clone(),
            document,
            errors: ErrorMap::new(),
            dirty: false,
        }
    }

    pub fn document(&self) -> &WidgetConfig {
        &self.document
    }

    /// Last loaded or saved document
    pub fn persisted(&self) -> &WidgetConfig {
        &self.persisted
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn history(&self) -> &History<WidgetConfig> {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply a partial change.
    ///
    /// The candidate is `patch` over the current document, normalized. An
    /// identical candidate is a no-op: no history entry, no dirty change.
    /// Invalid values are accepted into the document; their messages land in
    /// the error map.
    pub fn update(&mut self, patch: &WidgetConfigPatch) -> UpdateOutcome {
        let candidate = patch.apply_to(&self.document).normalized();
        if candidate == self.document {
            return UpdateOutcome::default();
        }

        let changed = Field::changed_between(&self.document, &candidate);
        self.document = candidate;
        self.history.push(self.document.clone());
        self.dirty = self.document != self.persisted;

        let field_errors = self.revalidate(&changed);
        debug!(
            "Updated {} field(s), history {}/{}",
            changed.len(),
            self.history.cursor() + 1,
            self.history.len()
        );
        UpdateOutcome {
            changed,
            field_errors,
        }
    }

    /// Step back one history entry
    pub fn undo(&mut self) -> Result<&WidgetConfig, HistoryError> {
        let previous = self
            .history
            .undo()
            .cloned()
            .ok_or(HistoryError::NothingToUndo)?;
        self.restore(previous);
        Ok(&self.document)
    }

    /// Step forward one history entry
    pub fn redo(&mut self) -> Result<&WidgetConfig, HistoryError> {
        let next = self
            .history
            .redo()
            .cloned()
            .ok_or(HistoryError::NothingToRedo)?;
        self.restore(next);
        Ok(&self.document)
    }

    /// Discard everything and start over from the default document.
    ///
    /// History collapses to the default alone; errors and dirty are cleared.
    /// The defaults also become the persisted baseline, so dirty keeps
    /// meaning "differs from the baseline" after a reset.
    pub fn reset_to_defaults(&mut self) {
        self.document = WidgetConfig::default();
        self.persisted = self.document.clone();
        self.history.reset(self.document.clone());
        self.errors.clear();
        self.dirty = false;
    }

    /// Run the document-level pass, replacing the error map
    pub fn validate_all(&mut self) -> &ErrorMap {
        self.errors = validate_document(&self.document);
        &self.errors
    }

    /// Record a single field error (e.g. unparseable input)
    pub fn set_field_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(path, message);
    }

    /// Merge externally reported errors over the current map
    pub fn merge_errors(&mut self, errors: ErrorMap) {
        self.errors.merge(errors);
    }

    /// Adopt a document fetched from the service.
    ///
    /// The document is appended to the existing history rather than
    /// replacing it, even when it equals the current snapshot. Any redo
    /// branch is dropped, so the log always ends with the loaded document.
    pub fn adopt_loaded(&mut self, loaded: WidgetConfig) {
        let loaded = loaded.normalized();
        self.history.append(loaded.clone());
        self.persisted = loaded.clone();
        self.document = loaded;
        self.errors.clear();
        self.dirty = false;
    }

    /// Adopt the service's canonical copy after a successful save.
    ///
    /// `sent` is the document that was submitted. If the operator kept
    /// editing while the save was in flight, those edits win over the
    /// canonical copy and dirty is recomputed against the new baseline.
    pub fn adopt_saved(&mut self, canonical: WidgetConfig, sent: &WidgetConfig) {
        let canonical = canonical.normalized();
        if &self.document == sent {
            if self.document != canonical {
                self.history.push(canonical.clone());
                self.document = canonical.clone();
            }
            self.errors.clear();
        }
        self.persisted = canonical;
        self.dirty = self.document != self.persisted;
    }

    fn restore(&mut self, snapshot: WidgetConfig) {
        let changed = Field::changed_between(&self.document, &snapshot);
        self.document = snapshot;
        self.dirty = self.document != self.persisted;
        self.revalidate(&changed);
    }

    /// Field-level pass over `changed` and the fields whose rules depend on them
    fn revalidate(&mut self, changed: &[Field]) -> Vec<(Field, String)> {
        let mut checked: Vec<Field> = Vec::new();
        for field in changed {
            for f in std::iter::once(field).chain(field.dependents()) {
                if !checked.contains(f) {
                    checked.push(*f);
                }
            }
        }
        checked.sort();

        let mut failures = Vec::new();
        for field in checked {
            match validate_field(field, &self.document) {
                Some(message) => {
                    self.errors.insert(field.path(), message.clone());
                    failures.push((field, message));
                }
                None => {
                    self.errors.remove(field.path());
                }
            }
        }
        failures
    }
}
