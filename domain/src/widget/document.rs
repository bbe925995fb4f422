//! Widget configuration document (Entity)
//!
//! [`WidgetConfig`] is the complete, always fully populated settings object
//! of a chat widget. Unset optional values carry the defaults returned by
//! [`WidgetConfig::default`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default widget display name
pub const DEFAULT_WIDGET_NAME: &str = "AI Assistant";
/// Default brand color
pub const DEFAULT_PRIMARY_COLOR: &str = "#4F46E5";
/// Default widget width in pixels
pub const DEFAULT_WIDTH: u32 = 380;
/// Default widget height in pixels
pub const DEFAULT_HEIGHT: u32 = 600;
/// Default greeting shown when the widget opens
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! How can I help you today?";
/// Default input placeholder
pub const DEFAULT_PLACEHOLDER_TEXT: &str = "Type your message...";
/// Default assistant display name
pub const DEFAULT_ASSISTANT_NAME: &str = "Assistant";
/// Default auto-trigger delay in seconds
pub const DEFAULT_TRIGGER_DELAY: u32 = 5;
/// Default auto-trigger message
pub const DEFAULT_TRIGGER_MESSAGE: &str = "Need any help? I'm here!";

/// Visual template of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    Modern,
    Minimal,
    Classic,
    Bubble,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Modern,
        Template::Minimal,
        Template::Classic,
        Template::Bubble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Modern => "modern",
            Template::Minimal => "minimal",
            Template::Classic => "classic",
            Template::Bubble => "bubble",
        }
    }
}

/// Screen corner the widget launcher is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::BottomRight,
        Position::BottomLeft,
        Position::TopRight,
        Position::TopLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
        }
    }
}

/// Color scheme of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

macro_rules! impl_choice {
    ($ty:ident, $field:literal, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace('_', "-");
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| {
                        let valid: Vec<_> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                        DomainError::invalid_value(
                            $field,
                            format!("{} must be one of: {}", $label, valid.join(", ")),
                        )
                    })
            }
        }
    };
}

impl_choice!(Template, "template", "Template");
impl_choice!(Position, "position", "Position");
impl_choice!(Theme, "theme", "Theme");

/// Proactive greeting policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTrigger {
    pub enabled: bool,
    /// Delay before the greeting opens, in whole seconds
    pub delay: u32,
    pub message: String,
}

impl Default for AutoTrigger {
    fn default() -> Self {
        Self {
            enabled: false,
            delay: DEFAULT_TRIGGER_DELAY,
            message: DEFAULT_TRIGGER_MESSAGE.to_string(),
        }
    }
}

/// The widget's complete configuration (Entity)
///
/// Field declaration order is significant: it is the order in which
/// validation failures are ranked when choosing which field to focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    // Identity
    pub widget_name: String,
    pub template: Template,
    // Visual
    pub primary_color: String,
    pub width: u32,
    pub height: u32,
    pub assistant_avatar: String,
    // Display
    pub position: Position,
    pub theme: Theme,
    // Behavior
    pub welcome_message: String,
    pub placeholder_text: String,
    pub assistant_name: String,
    pub auto_trigger: AutoTrigger,
    // References
    /// Selected AI model identifier; empty when no model is configured
    pub ai_model: String,
    pub knowledge_base: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_name: DEFAULT_WIDGET_NAME.to_string(),
            template: Template::default(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            assistant_avatar: String::new(),
            position: Position::default(),
            theme: Theme::default(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            placeholder_text: DEFAULT_PLACEHOLDER_TEXT.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            auto_trigger: AutoTrigger::default(),
            ai_model: String::new(),
            knowledge_base: Vec::new(),
        }
    }
}

impl WidgetConfig {
    /// Normalize-on-write step applied before a document enters history.
    ///
    /// Knowledge base entries are trimmed and blank entries dropped.
    pub fn normalized(mut self) -> Self {
        self.knowledge_base = self
            .knowledge_base
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Whether an AI model has been selected
    pub fn has_ai_model(&self) -> bool {
        !self.ai_model.trim().is_empty()
    }
}
