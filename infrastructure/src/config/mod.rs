//! Configuration file loading for widgetdesk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `WIDGETDESK_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./widgetdesk.toml` or `./.widgetdesk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/widgetdesk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FileApiConfig,
    FileConfig, FileEditorConfig, FileOutputConfig, Severity,
};
pub use loader::ConfigLoader;
