//! Application-level configuration.
//!
//! This module provides configuration types that control how the editor
//! session behaves, such as gateway timeouts and notification policy.

use std::time::Duration;

/// Editor session behavior configuration.
#[derive(Debug, Clone)]
pub struct EditorBehavior {
    /// Maximum time to wait for a gateway response before timing out.
    pub timeout: Option<Duration>,
    /// Raise a transient notification when a mutation leaves a field invalid.
    pub notify_field_errors: bool,
    /// Ask the gateway to validate the document before create/update.
    pub remote_validation: bool,
}

impl Default for EditorBehavior {
    fn default() -> Self {
        Self {
            timeout: None,
            notify_field_errors: true,
            remote_validation: false,
        }
    }
}

impl EditorBehavior {
    /// Creates an EditorBehavior from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_field_notifications(mut self, enabled: bool) -> Self {
        self.notify_field_errors = enabled;
        self
    }

    pub fn with_remote_validation(mut self, enabled: bool) -> Self {
        self.remote_validation = enabled;
        self
    }
}
