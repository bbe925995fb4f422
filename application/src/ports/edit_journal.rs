//! Port for a structured journal of editor commands.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while the journal captures command outcomes
//! (loads, saves, tests, resets) in a machine-readable form.

use serde_json::Value;

/// A structured journal entry.
pub struct JournalEvent {
    /// Event type identifier (e.g. "loaded", "saved", "save_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl JournalEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording editor command outcomes.
///
/// `record` is synchronous and non-fallible; journal failures must never
/// disturb an editing session.
pub trait EditJournal: Send + Sync {
    fn record(&self, event: JournalEvent);
}

/// No-op implementation for tests and when journaling is disabled.
pub struct NoEditJournal;

impl EditJournal for NoEditJournal {
    fn record(&self, _event: JournalEvent) {}
}
