//! Type definitions for the EditWidget use case.

use crate::ports::config_gateway::{ConfigId, GatewayError};
use crate::store::HistoryError;
use thiserror::Error;
use widgetdesk_domain::{DomainError, ErrorMap, Section, WidgetConfig};

/// Errors returned by editor session commands.
///
/// Every error has already been reported to the notifier by the time it is
/// returned; callers may ignore it for display purposes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    InvalidInput(#[from] DomainError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("{message}")]
    ValidationFailed {
        count: usize,
        field: Option<String>,
        message: String,
    },

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Save the widget before duplicating it")]
    NotSaved,

    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: GatewayError,
    },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Editor session closed")]
    SessionClosed,
}

impl EditorError {
    /// Check if this error came from the session being closed mid-command
    pub fn is_session_closed(&self) -> bool {
        matches!(self, EditorError::SessionClosed)
    }
}

/// Synchronization controller state.
///
/// `Idle → Loading → {Loaded | LoadFailed}` and
/// `Idle/Loaded → Validating → {SaveInFlight → {Saved | SaveFailed} | ValidationFailed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadFailed,
    Validating,
    ValidationFailed,
    SaveInFlight,
    Saved,
    SaveFailed,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::Loading => "loading",
            SyncState::Loaded => "loaded",
            SyncState::LoadFailed => "load-failed",
            SyncState::Validating => "validating",
            SyncState::ValidationFailed => "validation-failed",
            SyncState::SaveInFlight => "saving",
            SyncState::Saved => "saved",
            SyncState::SaveFailed => "save-failed",
        }
    }
}

/// Everything the UI layer renders from a session
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub document: WidgetConfig,
    pub dirty: bool,
    pub errors: ErrorMap,
    pub active_section: Section,
    pub can_undo: bool,
    pub can_redo: bool,
    pub identity: Option<ConfigId>,
    pub state: SyncState,
    /// Whether a network command is outstanding
    pub busy: bool,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub id: ConfigId,
    /// Whether this save created the remote record
    pub created: bool,
    pub document: WidgetConfig,
}

/// Result of a widget test.
///
/// Four distinct outcomes once the document itself is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// No model configured; the widget runs in fallback mode
    Fallback,
    /// The model identifier matches no recognized pattern
    InvalidModel(String),
    /// Recognized model, but the service's test did not pass
    Failed(String),
    /// Recognized model and the service's test passed
    Passed(String),
}
