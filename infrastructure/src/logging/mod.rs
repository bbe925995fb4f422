//! Logging infrastructure: structured edit journal.
//!
//! Provides [`JsonlEditJournal`], a JSONL file writer that implements
//! the [`EditJournal`](widgetdesk_application::EditJournal) port.

mod jsonl_journal;

pub use jsonl_journal::JsonlEditJournal;
