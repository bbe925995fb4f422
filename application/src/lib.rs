//! Application layer for widgetdesk
//!
//! This crate contains the configuration store, the editor session use
//! case, port definitions, and editor behavior settings.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod shortcuts;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use config::EditorBehavior;
pub use ports::{
    config_gateway::{
        ConfigId, FieldErrors, GatewayError, StoredConfig, TestReport, ValidationReport,
        WidgetConfigGateway, WidgetConfigPayload,
    },
    edit_journal::{EditJournal, JournalEvent, NoEditJournal},
    notifier::{EditorNotifier, NoNotifier, Notice, NoticeLevel},
};
pub use shortcuts::{CommandDispatcher, ShortcutRegistration};
pub use store::{ConfigStore, HistoryError, UpdateOutcome};
pub use use_cases::edit_widget::{
    EditorError, EditorSession, EditorSnapshot, SaveFailure, SaveFailureKind, SaveReport,
    SyncState, TestOutcome,
};
