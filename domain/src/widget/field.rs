//! Field paths and the field → section table.
//!
//! Every editable value of a [`WidgetConfig`] is addressed by a [`Field`].
//! `Field::ALL` lists them in document declaration order, which is the
//! order used to pick the first failing field after a validation pass.

use super::document::WidgetConfig;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editor section (tab) that groups related fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Identity fields
    #[default]
    Templates,
    /// Visual fields
    Design,
    /// Behavioral fields
    Behavior,
    /// Display and theming fields
    Controls,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Templates,
        Section::Design,
        Section::Behavior,
        Section::Controls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Templates => "templates",
            Section::Design => "design",
            Section::Behavior => "behavior",
            Section::Controls => "controls",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or(DomainError::UnknownSection(s))
    }
}

/// Addressable field of the widget configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    WidgetName,
    Template,
    PrimaryColor,
    Width,
    Height,
    AssistantAvatar,
    Position,
    Theme,
    WelcomeMessage,
    PlaceholderText,
    AssistantName,
    AutoTriggerEnabled,
    AutoTriggerDelay,
    AutoTriggerMessage,
    AiModel,
    KnowledgeBase,
}

impl Field {
    /// All fields in declaration order
    pub const ALL: [Field; 16] = [
        Field::WidgetName,
        Field::Template,
        Field::PrimaryColor,
        Field::Width,
        Field::Height,
        Field::AssistantAvatar,
        Field::Position,
        Field::Theme,
        Field::WelcomeMessage,
        Field::PlaceholderText,
        Field::AssistantName,
        Field::AutoTriggerEnabled,
        Field::AutoTriggerDelay,
        Field::AutoTriggerMessage,
        Field::AiModel,
        Field::KnowledgeBase,
    ];

    /// Document path used as the error map key
    pub fn path(&self) -> &'static str {
        match self {
            Field::WidgetName => "widgetName",
            Field::Template => "template",
            Field::PrimaryColor => "primaryColor",
            Field::Width => "width",
            Field::Height => "height",
            Field::AssistantAvatar => "assistantAvatar",
            Field::Position => "position",
            Field::Theme => "theme",
            Field::WelcomeMessage => "welcomeMessage",
            Field::PlaceholderText => "placeholderText",
            Field::AssistantName => "assistantName",
            Field::AutoTriggerEnabled => "autoTrigger.enabled",
            Field::AutoTriggerDelay => "autoTrigger.delay",
            Field::AutoTriggerMessage => "autoTrigger.message",
            Field::AiModel => "aiModel",
            Field::KnowledgeBase => "knowledgeBase",
        }
    }

    /// Key used by the persistence format
    pub fn storage_key(&self) -> &'static str {
        match self {
            Field::WidgetName => "widget_name",
            Field::Template => "template",
            Field::PrimaryColor => "primary_color",
            Field::Width => "width",
            Field::Height => "height",
            Field::AssistantAvatar => "assistant_avatar",
            Field::Position => "position",
            Field::Theme => "theme",
            Field::WelcomeMessage => "welcome_message",
            Field::PlaceholderText => "placeholder_text",
            Field::AssistantName => "assistant_name",
            Field::AutoTriggerEnabled => "auto_trigger.enabled",
            Field::AutoTriggerDelay => "auto_trigger.delay",
            Field::AutoTriggerMessage => "auto_trigger.message",
            Field::AiModel => "ai_model",
            Field::KnowledgeBase => "knowledge_base",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::WidgetName => "Widget name",
            Field::Template => "Template",
            Field::PrimaryColor => "Primary color",
            Field::Width => "Width",
            Field::Height => "Height",
            Field::AssistantAvatar => "Assistant avatar",
            Field::Position => "Position",
            Field::Theme => "Theme",
            Field::WelcomeMessage => "Welcome message",
            Field::PlaceholderText => "Placeholder text",
            Field::AssistantName => "Assistant name",
            Field::AutoTriggerEnabled => "Auto-trigger",
            Field::AutoTriggerDelay => "Auto-trigger delay",
            Field::AutoTriggerMessage => "Auto-trigger message",
            Field::AiModel => "AI model",
            Field::KnowledgeBase => "Knowledge base",
        }
    }

    /// Position of this field in declaration order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn section(&self) -> Section {
        match self {
            Field::WidgetName | Field::Template => Section::Templates,
            Field::PrimaryColor | Field::Width | Field::Height | Field::AssistantAvatar => {
                Section::Design
            }
            Field::Position | Field::Theme => Section::Controls,
            Field::WelcomeMessage
            | Field::PlaceholderText
            | Field::AssistantName
            | Field::AutoTriggerEnabled
            | Field::AutoTriggerDelay
            | Field::AutoTriggerMessage
            | Field::AiModel
            | Field::KnowledgeBase => Section::Behavior,
        }
    }

    /// Resolve a field from its document path or storage key.
    ///
    /// Server error maps may use either spelling, and some servers flatten
    /// nested keys with an underscore (`auto_trigger_delay`).
    pub fn from_path(path: &str) -> Option<Field> {
        let path = path.trim();
        Field::ALL.iter().copied().find(|field| {
            field.path() == path
                || field.storage_key() == path
                || field.storage_key().replace('.', "_") == path
        })
    }

    /// Fields whose rules also depend on this field's value
    pub fn dependents(&self) -> &'static [Field] {
        match self {
            Field::AutoTriggerEnabled => &[Field::AutoTriggerDelay, Field::AutoTriggerMessage],
            _ => &[],
        }
    }

    /// Whether this field holds different values in the two documents
    pub fn differs(&self, a: &WidgetConfig, b: &WidgetConfig) -> bool {
        match self {
            Field::WidgetName => a.widget_name != b.widget_name,
            Field::Template => a.template != b.template,
            Field::PrimaryColor => a.primary_color != b.primary_color,
            Field::Width => a.width != b.width,
            Field::Height => a.height != b.height,
            Field::AssistantAvatar => a.assistant_avatar != b.assistant_avatar,
            Field::Position => a.position != b.position,
            Field::Theme => a.theme != b.theme,
            Field::WelcomeMessage => a.welcome_message != b.welcome_message,
            Field::PlaceholderText => a.placeholder_text != b.placeholder_text,
            Field::AssistantName => a.assistant_name != b.assistant_name,
            Field::AutoTriggerEnabled => a.auto_trigger.enabled != b.auto_trigger.enabled,
            Field::AutoTriggerDelay => a.auto_trigger.delay != b.auto_trigger.delay,
            Field::AutoTriggerMessage => a.auto_trigger.message != b.auto_trigger.message,
            Field::AiModel => a.ai_model != b.ai_model,
            Field::KnowledgeBase => a.knowledge_base != b.knowledge_base,
        }
    }

    /// Fields that differ between two documents, in declaration order
    pub fn changed_between(a: &WidgetConfig, b: &WidgetConfig) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|field| field.differs(a, b))
            .collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Field {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_path(s).ok_or_else(|| DomainError::UnknownField(s.trim().to_string()))
    }
}
