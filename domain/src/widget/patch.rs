//! Partial changes to a widget configuration.
//!
//! A [`WidgetConfigPatch`] carries only the fields a UI mutation touched.
//! Applying it to a full document always yields a full document.

use super::document::{AutoTrigger, Position, Template, Theme, WidgetConfig};
use super::field::Field;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Partial auto-trigger change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoTriggerPatch {
    pub enabled: Option<bool>,
    pub delay: Option<u32>,
    pub message: Option<String>,
}

impl AutoTriggerPatch {
    fn apply_to(&self, base: &AutoTrigger) -> AutoTrigger {
        AutoTrigger {
            enabled: self.enabled.unwrap_or(base.enabled),
            delay: self.delay.unwrap_or(base.delay),
            message: self.message.clone().unwrap_or_else(|| base.message.clone()),
        }
    }
}

/// Partial widget configuration change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfigPatch {
    pub widget_name: Option<String>,
    pub template: Option<Template>,
    pub primary_color: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub assistant_avatar: Option<String>,
    pub position: Option<Position>,
    pub theme: Option<Theme>,
    pub welcome_message: Option<String>,
    pub placeholder_text: Option<String>,
    pub assistant_name: Option<String>,
    pub auto_trigger: AutoTriggerPatch,
    pub ai_model: Option<String>,
    pub knowledge_base: Option<Vec<String>>,
}

impl WidgetConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-field patch from operator text input.
    ///
    /// Enumerated and numeric fields are parsed here; an unparseable value
    /// is reported with the field's path so it can land in the error map.
    pub fn from_input(field: Field, raw: &str) -> Result<Self, DomainError> {
        let mut patch = Self::default();
        let text = raw.to_string();
        match field {
            Field::WidgetName => patch.widget_name = Some(text),
            Field::Template => patch.template = Some(raw.parse()?),
            Field::PrimaryColor => patch.primary_color = Some(raw.trim().to_string()),
            Field::Width => patch.width = Some(parse_whole(field, raw)?),
            Field::Height => patch.height = Some(parse_whole(field, raw)?),
            Field::AssistantAvatar => patch.assistant_avatar = Some(raw.trim().to_string()),
            Field::Position => patch.position = Some(raw.parse()?),
            Field::Theme => patch.theme = Some(raw.parse()?),
            Field::WelcomeMessage => patch.welcome_message = Some(text),
            Field::PlaceholderText => patch.placeholder_text = Some(text),
            Field::AssistantName => patch.assistant_name = Some(text),
            Field::AutoTriggerEnabled => patch.auto_trigger.enabled = Some(parse_flag(field, raw)?),
            Field::AutoTriggerDelay => patch.auto_trigger.delay = Some(parse_whole(field, raw)?),
            Field::AutoTriggerMessage => patch.auto_trigger.message = Some(text),
            Field::AiModel => patch.ai_model = Some(raw.trim().to_string()),
            Field::KnowledgeBase => {
                patch.knowledge_base = Some(raw.split(',').map(str::to_string).collect())
            }
        }
        Ok(patch)
    }

    pub fn widget_name(mut self, value: impl Into<String>) -> Self {
        self.widget_name = Some(value.into());
        self
    }

    pub fn primary_color(mut self, value: impl Into<String>) -> Self {
        self.primary_color = Some(value.into());
        self
    }

    pub fn welcome_message(mut self, value: impl Into<String>) -> Self {
        self.welcome_message = Some(value.into());
        self
    }

    pub fn ai_model(mut self, value: impl Into<String>) -> Self {
        self.ai_model = Some(value.into());
        self
    }

    pub fn theme(mut self, value: Theme) -> Self {
        self.theme = Some(value);
        self
    }

    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn auto_trigger(mut self, enabled: bool, delay: u32, message: impl Into<String>) -> Self {
        self.auto_trigger = AutoTriggerPatch {
            enabled: Some(enabled),
            delay: Some(delay),
            message: Some(message.into()),
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlay this patch on `base`, producing a full document
    pub fn apply_to(&self, base: &WidgetConfig) -> WidgetConfig {
        WidgetConfig {
            widget_name: pick(&self.widget_name, &base.widget_name),
            template: self.template.unwrap_or(base.template),
            primary_color: pick(&self.primary_color, &base.primary_color),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            assistant_avatar: pick(&self.assistant_avatar, &base.assistant_avatar),
            position: self.position.unwrap_or(base.position),
            theme: self.theme.unwrap_or(base.theme),
            welcome_message: pick(&self.welcome_message, &base.welcome_message),
            placeholder_text: pick(&self.placeholder_text, &base.placeholder_text),
            assistant_name: pick(&self.assistant_name, &base.assistant_name),
            auto_trigger: self.auto_trigger.apply_to(&base.auto_trigger),
            ai_model: pick(&self.ai_model, &base.ai_model),
            knowledge_base: pick(&self.knowledge_base, &base.knowledge_base),
        }
    }
}

fn pick<T: Clone>(value: &Option<T>, fallback: &T) -> T {
    value.clone().unwrap_or_else(|| fallback.clone())
}

fn parse_whole(field: Field, raw: &str) -> Result<u32, DomainError> {
    raw.trim().parse().map_err(|_| {
        DomainError::invalid_value(
            field.path(),
            format!("{} must be a whole number", field.label()),
        )
    })
}

fn parse_flag(field: Field, raw: &str) -> Result<bool, DomainError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(DomainError::invalid_value(
            field.path(),
            format!("{} must be on or off", field.label()),
        )),
    }
}
