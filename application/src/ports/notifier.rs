//! Notification port
//!
//! Defines how the editor surfaces transient, user-facing messages
//! (toasts, status lines) to whatever UI hosts the session.

use std::fmt;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Callback for user-facing notices raised by the editor session
///
/// Implementations live in the presentation layer and can display
/// notices in various ways (console, toast, status bar).
pub trait EditorNotifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// No-op notifier for when notices are not displayed
pub struct NoNotifier;

impl EditorNotifier for NoNotifier {
    fn notify(&self, _notice: Notice) {}
}
