//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use widgetdesk_application::EditorBehavior;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("api.base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),

    #[error("api.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("editor.journal_path cannot be empty")]
    EmptyJournalPath,
}

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found in a loaded configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", label, self.error)
    }
}

/// Remote service settings (`[api]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the widget configuration service
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Editor settings (`[editor]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEditorConfig {
    /// Use the in-memory gateway instead of the remote service
    pub offline: bool,
    /// Where to append the JSONL edit journal
    pub journal_path: Option<PathBuf>,
    /// Raise a notice for every field-level failure while editing
    pub notify_field_errors: bool,
    /// Ask the service to validate before each save
    pub remote_validation: bool,
}

impl Default for FileEditorConfig {
    fn default() -> Self {
        Self {
            offline: false,
            journal_path: None,
            notify_field_errors: true,
            remote_validation: false,
        }
    }
}

/// Output settings (`[output]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub editor: FileEditorConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Remote settings are only errors when the editor talks to the
    /// service; offline sessions downgrade them to warnings.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let remote = if self.editor.offline {
            Severity::Warning
        } else {
            Severity::Error
        };
        let mut issues = Vec::new();
        let mut push = |severity, error| issues.push(ConfigIssue { severity, error });

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            push(remote, ConfigValidationError::EmptyBaseUrl);
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            push(
                remote,
                ConfigValidationError::InvalidBaseUrl(base_url.to_string()),
            );
        }
        if self.api.timeout_secs == 0 {
            push(remote, ConfigValidationError::InvalidTimeout);
        }
        if self
            .editor
            .journal_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            push(Severity::Warning, ConfigValidationError::EmptyJournalPath);
        }
        issues
    }

    /// Fail on the first error-level issue
    pub fn ensure_valid(&self) -> Result<(), ConfigValidationError> {
        match self
            .validate()
            .into_iter()
            .find(|issue| issue.severity == Severity::Error)
        {
            Some(issue) => Err(issue.error),
            None => Ok(()),
        }
    }

    /// Editor session settings derived from this file
    pub fn editor_behavior(&self) -> EditorBehavior {
        EditorBehavior::from_timeout_seconds(Some(self.api.timeout_secs))
            .with_field_notifications(self.editor.notify_field_errors)
            .with_remote_validation(self.editor.remote_validation)
    }

    /// Journal path, ignoring an empty value
    pub fn journal_path(&self) -> Option<&PathBuf> {
        self.editor
            .journal_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[api]
base_url = "https://widgets.example.com/api"
token = "secret"
timeout_secs = 10

[editor]
offline = true
journal_path = "/tmp/widgetdesk.jsonl"
remote_validation = true

[output]
color = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://widgets.example.com/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.editor.offline);
        assert!(config.editor.notify_field_errors);
        assert!(config.editor.remote_validation);
        assert_eq!(
            config.journal_path(),
            Some(&PathBuf::from("/tmp/widgetdesk.jsonl"))
        );
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config_uses_defaults() {
        let config: FileConfig = toml::from_str("[editor]\noffline = true\n").unwrap();
        assert_eq!(config.api, FileApiConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(FileConfig::default().validate().is_empty());
        assert!(FileConfig::default().ensure_valid().is_ok());
    }

    #[test]
    fn test_validate_reports_remote_errors() {
        let mut config = FileConfig::default();
        config.api.base_url = "widgets.example.com".to_string();
        config.api.timeout_secs = 0;
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert_eq!(
            config.ensure_valid(),
            Err(ConfigValidationError::InvalidBaseUrl(
                "widgets.example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_offline_downgrades_remote_errors() {
        let mut config = FileConfig::default();
        config.api.base_url = String::new();
        config.editor.offline = true;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].to_string(), "warning: api.base_url cannot be empty");
        assert!(config.ensure_valid().is_ok());
    }

    #[test]
    fn test_editor_behavior_conversion() {
        let mut config = FileConfig::default();
        config.api.timeout_secs = 12;
        config.editor.notify_field_errors = false;
        let behavior = config.editor_behavior();
        assert_eq!(behavior.timeout, Some(Duration::from_secs(12)));
        assert!(!behavior.notify_field_errors);
        assert!(!behavior.remote_validation);
    }
}
