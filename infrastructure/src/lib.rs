//! Infrastructure layer for widgetdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod api;
pub mod config;
pub mod logging;
pub mod memory;

// Re-export commonly used types
pub use api::{error::HttpGatewayError, gateway::HttpWidgetConfigGateway};
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileApiConfig, FileConfig,
    FileEditorConfig, FileOutputConfig, Severity,
};
pub use logging::JsonlEditJournal;
pub use memory::InMemoryWidgetConfigGateway;
