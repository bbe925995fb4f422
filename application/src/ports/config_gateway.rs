//! Widget configuration gateway port
//!
//! Defines the interface for the remote persistence/validation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use widgetdesk_domain::{AutoTrigger, Position, Template, Theme, WidgetConfig};

/// Field → messages structure reported by the service
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Opaque remote identifier of a stored widget configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(String);

impl ConfigId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ConfigId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ConfigId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Auto-trigger block of the persistence format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTriggerPayload {
    pub enabled: bool,
    pub delay: u32,
    pub message: String,
}

impl Default for AutoTriggerPayload {
    fn default() -> Self {
        AutoTrigger::default().into()
    }
}

impl From<AutoTrigger> for AutoTriggerPayload {
    fn from(trigger: AutoTrigger) -> Self {
        Self {
            enabled: trigger.enabled,
            delay: trigger.delay,
            message: trigger.message,
        }
    }
}

/// Persistence format of a widget configuration.
///
/// Every field is defaulted on deserialization, so a server that omits or
/// nulls an optional value still yields a fully populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfigPayload {
    pub widget_name: String,
    pub template: Template,
    pub primary_color: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_avatar: Option<String>,
    pub position: Position,
    pub theme: Theme,
    pub welcome_message: String,
    pub placeholder_text: String,
    pub assistant_name: String,
    pub auto_trigger: AutoTriggerPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    pub knowledge_base: Vec<String>,
}

impl Default for WidgetConfigPayload {
    fn default() -> Self {
        Self::from(&WidgetConfig::default())
    }
}

impl From<&WidgetConfig> for WidgetConfigPayload {
    fn from(config: &WidgetConfig) -> Self {
        let optional = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
        Self {
            widget_name: config.widget_name.trim().to_string(),
            template: config.template,
            primary_color: config.primary_color.clone(),
            width: config.width,
            height: config.height,
            assistant_avatar: optional(&config.assistant_avatar),
            position: config.position,
            theme: config.theme,
            welcome_message: config.welcome_message.clone(),
            placeholder_text: config.placeholder_text.clone(),
            assistant_name: config.assistant_name.clone(),
            auto_trigger: config.auto_trigger.clone().into(),
            ai_model: optional(&config.ai_model),
            knowledge_base: config.knowledge_base.clone(),
        }
    }
}

impl WidgetConfigPayload {
    /// Convert into a normalized document
    pub fn into_config(self) -> WidgetConfig {
        WidgetConfig {
            widget_name: self.widget_name,
            template: self.template,
            primary_color: self.primary_color,
            width: self.width,
            height: self.height,
            assistant_avatar: self.assistant_avatar.unwrap_or_default(),
            position: self.position,
            theme: self.theme,
            welcome_message: self.welcome_message,
            placeholder_text: self.placeholder_text,
            assistant_name: self.assistant_name,
            auto_trigger: AutoTrigger {
                enabled: self.auto_trigger.enabled,
                delay: self.auto_trigger.delay,
                message: self.auto_trigger.message,
            },
            ai_model: self.ai_model.unwrap_or_default(),
            knowledge_base: self.knowledge_base,
        }
        .normalized()
    }
}

/// A stored configuration together with its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub id: ConfigId,
    pub config: WidgetConfigPayload,
}

/// Result of a remote validation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: FieldErrors,
}

/// Result of a remote widget test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub success: bool,
    pub message: String,
}

/// Errors that can occur during gateway operations.
///
/// Rejections carry the HTTP-status-equivalent class: 422 is a validation
/// failure, 409 a conflict (e.g. a duplicate widget name); anything else is
/// generic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Validation failed: {message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Conflict: {message}")]
    Conflict { message: String, errors: FieldErrors },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Classify a rejected request by its status code
    pub fn from_status(status: u16, message: impl Into<String>, errors: FieldErrors) -> Self {
        let message = message.into();
        match status {
            422 => GatewayError::Validation { message, errors },
            409 => GatewayError::Conflict { message, errors },
            404 => GatewayError::NotFound(message),
            _ => GatewayError::Status { status, message },
        }
    }

    /// HTTP-status-equivalent code, when the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Validation { .. } => Some(422),
            GatewayError::Conflict { .. } => Some(409),
            GatewayError::NotFound(_) => Some(404),
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::ConnectionError(_)
            | GatewayError::InvalidResponse(_)
            | GatewayError::Timeout => None,
        }
    }

    /// Field attribution carried by the rejection, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            GatewayError::Validation { errors, .. } | GatewayError::Conflict { errors, .. } => {
                Some(errors)
            }
            _ => None,
        }
    }
}

/// Gateway for widget configuration persistence
///
/// This port defines how the application layer talks to the remote
/// configuration service. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait WidgetConfigGateway: Send + Sync {
    /// Fetch the canonical document for `id`
    async fn get(&self, id: &ConfigId) -> Result<WidgetConfigPayload, GatewayError>;

    /// Store a new document and return its identifier
    async fn create(&self, payload: &WidgetConfigPayload) -> Result<StoredConfig, GatewayError>;

    /// Replace the document stored under `id`
    async fn update(
        &self,
        id: &ConfigId,
        payload: &WidgetConfigPayload,
    ) -> Result<WidgetConfigPayload, GatewayError>;

    /// Copy the document stored under `id` into a new record named `new_name`
    async fn duplicate(&self, id: &ConfigId, new_name: &str)
    -> Result<StoredConfig, GatewayError>;

    /// Validate a document without storing it
    async fn validate(&self, payload: &WidgetConfigPayload)
    -> Result<ValidationReport, GatewayError>;

    /// Run the service's end-to-end widget test
    async fn test(&self, payload: &WidgetConfigPayload) -> Result<TestReport, GatewayError>;
}
