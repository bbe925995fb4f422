//! Schema validators for widget configuration documents.
//!
//! Two passes share the same rule table:
//!
//! - [`validate_field`] checks one field and runs on every mutation
//! - [`validate_document`] checks every field and runs before persistence
//!
//! Rules that depend on another field (the auto-trigger delay and message
//! only apply while the trigger is enabled) read the whole document, so
//! both passes agree on whether a value is acceptable.

use super::document::WidgetConfig;
use super::errors::ErrorMap;
use super::field::Field;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const WIDGET_NAME_LENGTH: RangeInclusive<usize> = 3..=50;
pub const WIDTH_RANGE: RangeInclusive<u32> = 280..=600;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 400..=800;
pub const AVATAR_MAX_LENGTH: usize = 500;
pub const WELCOME_MESSAGE_LENGTH: RangeInclusive<usize> = 5..=500;
pub const PLACEHOLDER_LENGTH: RangeInclusive<usize> = 3..=100;
pub const ASSISTANT_NAME_MAX_LENGTH: usize = 50;
pub const TRIGGER_DELAY_RANGE: RangeInclusive<u32> = 1..=300;
pub const TRIGGER_MESSAGE_LENGTH: RangeInclusive<usize> = 5..=200;
pub const AI_MODEL_MAX_LENGTH: usize = 100;
pub const KNOWLEDGE_BASE_MAX_SOURCES: usize = 20;
pub const KNOWLEDGE_SOURCE_MAX_LENGTH: usize = 500;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color pattern"));

static WIDGET_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 _-]+$").expect("valid widget name pattern"));

/// Check a single field of `config` against its rule.
///
/// Returns the human-readable message on failure, `None` when valid.
pub fn validate_field(field: Field, config: &WidgetConfig) -> Option<String> {
    match field {
        Field::WidgetName => check_widget_name(&config.widget_name),
        // Enumerated fields are closed Rust enums; an out-of-set value can't be held.
        Field::Template | Field::Position | Field::Theme | Field::AutoTriggerEnabled => None,
        Field::PrimaryColor => (!HEX_COLOR.is_match(&config.primary_color))
            .then(|| "Primary color must be a valid hex color (e.g. #4F46E5)".to_string()),
        Field::Width => check_range("Width", config.width, &WIDTH_RANGE, "pixels"),
        Field::Height => check_range("Height", config.height, &HEIGHT_RANGE, "pixels"),
        Field::AssistantAvatar => check_avatar(&config.assistant_avatar),
        Field::WelcomeMessage => {
            check_length("Welcome message", &config.welcome_message, &WELCOME_MESSAGE_LENGTH)
        }
        Field::PlaceholderText => {
            check_length("Placeholder text", &config.placeholder_text, &PLACEHOLDER_LENGTH)
        }
        Field::AssistantName => check_assistant_name(&config.assistant_name),
        Field::AutoTriggerDelay => config.auto_trigger.enabled.then(|| {
            check_range(
                "Auto-trigger delay",
                config.auto_trigger.delay,
                &TRIGGER_DELAY_RANGE,
                "seconds",
            )
        })
        .flatten(),
        Field::AutoTriggerMessage => config.auto_trigger.enabled.then(|| {
            check_length(
                "Auto-trigger message",
                &config.auto_trigger.message,
                &TRIGGER_MESSAGE_LENGTH,
            )
        })
        .flatten(),
        Field::AiModel => (config.ai_model.trim().chars().count() > AI_MODEL_MAX_LENGTH).then(|| {
            format!("AI model identifier must be at most {AI_MODEL_MAX_LENGTH} characters")
        }),
        Field::KnowledgeBase => check_knowledge_base(&config.knowledge_base),
    }
}

/// Check every field of `config`, producing a fresh error map
pub fn validate_document(config: &WidgetConfig) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in Field::ALL {
        if let Some(message) = validate_field(field, config) {
            errors.insert(field.path(), message);
        }
    }
    errors
}

fn check_widget_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Widget name is required".to_string());
    }
    if let Some(message) = check_length("Widget name", name, &WIDGET_NAME_LENGTH) {
        return Some(message);
    }
    (!WIDGET_NAME_CHARS.is_match(name)).then(|| {
        "Widget name can only contain letters, numbers, spaces, hyphens and underscores"
            .to_string()
    })
}

fn check_assistant_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Assistant name is required".to_string());
    }
    (name.chars().count() > ASSISTANT_NAME_MAX_LENGTH).then(|| {
        format!("Assistant name must be at most {ASSISTANT_NAME_MAX_LENGTH} characters")
    })
}

fn check_avatar(avatar: &str) -> Option<String> {
    if avatar.is_empty() {
        return None;
    }
    if avatar.chars().count() > AVATAR_MAX_LENGTH {
        return Some(format!(
            "Assistant avatar must be at most {AVATAR_MAX_LENGTH} characters"
        ));
    }
    let accepted = ["http://", "https://", "data:image/"]
        .iter()
        .any(|prefix| avatar.starts_with(prefix));
    (!accepted).then(|| "Assistant avatar must be an http(s) URL or an image data URI".to_string())
}

fn check_knowledge_base(sources: &[String]) -> Option<String> {
    if sources.len() > KNOWLEDGE_BASE_MAX_SOURCES {
        return Some(format!(
            "Knowledge base can have at most {KNOWLEDGE_BASE_MAX_SOURCES} sources"
        ));
    }
    sources
        .iter()
        .any(|s| s.chars().count() > KNOWLEDGE_SOURCE_MAX_LENGTH)
        .then(|| {
            format!(
                "Knowledge base sources must be at most {KNOWLEDGE_SOURCE_MAX_LENGTH} characters"
            )
        })
}

fn check_length(label: &str, value: &str, bounds: &RangeInclusive<usize>) -> Option<String> {
    let len = value.trim().chars().count();
    if len < *bounds.start() {
        Some(format!(
            "{label} must be at least {} characters",
            bounds.start()
        ))
    } else if len > *bounds.end() {
        Some(format!("{label} must be at most {} characters", bounds.end()))
    } else {
        None
    }
}

fn check_range(
    label: &str,
    value: u32,
    bounds: &RangeInclusive<u32>,
    unit: &str,
) -> Option<String> {
    (!bounds.contains(&value)).then(|| {
        format!(
            "{label} must be between {} and {} {unit}",
            bounds.start(),
            bounds.end()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(edit: impl FnOnce(&mut WidgetConfig)) -> WidgetConfig {
        let mut config = WidgetConfig::default();
        edit(&mut config);
        config
    }

    // ==================== Field rules ====================

    #[test]
    fn test_default_document_is_valid() {
        assert!(validate_document(&WidgetConfig::default()).is_empty());
    }

    #[test]
    fn test_empty_widget_name_is_required() {
        let config = with(|c| c.widget_name = String::new());
        assert_eq!(
            validate_field(Field::WidgetName, &config).as_deref(),
            Some("Widget name is required")
        );
    }

    #[test]
    fn test_widget_name_character_set() {
        let config = with(|c| c.widget_name = "My Bot!".to_string());
        assert!(validate_field(Field::WidgetName, &config).is_some());

        let config = with(|c| c.widget_name = "My_Bot-2 beta".to_string());
        assert!(validate_field(Field::WidgetName, &config).is_none());
    }

    #[test]
    fn test_widget_name_length() {
        let config = with(|c| c.widget_name = "ab".to_string());
        assert_eq!(
            validate_field(Field::WidgetName, &config).as_deref(),
            Some("Widget name must be at least 3 characters")
        );
        let config = with(|c| c.widget_name = "a".repeat(51));
        assert_eq!(
            validate_field(Field::WidgetName, &config).as_deref(),
            Some("Widget name must be at most 50 characters")
        );
    }

    #[test]
    fn test_primary_color_requires_six_digit_hex() {
        for bad in ["blue", "#FFF", "4F46E5", "#4F46E5F", "#GGGGGG"] {
            let config = with(|c| c.primary_color = bad.to_string());
            assert!(
                validate_field(Field::PrimaryColor, &config).is_some(),
                "{bad} should be rejected"
            );
        }
        let config = with(|c| c.primary_color = "#4f46e5".to_string());
        assert!(validate_field(Field::PrimaryColor, &config).is_none());
    }

    #[test]
    fn test_dimension_bounds_are_inclusive() {
        let config = with(|c| {
            c.width = 280;
            c.height = 800;
        });
        assert!(validate_field(Field::Width, &config).is_none());
        assert!(validate_field(Field::Height, &config).is_none());

        let config = with(|c| c.width = 601);
        assert_eq!(
            validate_field(Field::Width, &config).as_deref(),
            Some("Width must be between 280 and 600 pixels")
        );
        let config = with(|c| c.height = 399);
        assert!(validate_field(Field::Height, &config).is_some());
    }

    #[test]
    fn test_welcome_message_minimum() {
        let config = with(|c| c.welcome_message = "Hi".to_string());
        assert_eq!(
            validate_field(Field::WelcomeMessage, &config).as_deref(),
            Some("Welcome message must be at least 5 characters")
        );
    }

    #[test]
    fn test_avatar_accepts_urls_and_data_uris() {
        for ok in ["", "https://cdn.example.com/a.png", "data:image/png;base64,AAAA"] {
            let config = with(|c| c.assistant_avatar = ok.to_string());
            assert!(validate_field(Field::AssistantAvatar, &config).is_none());
        }
        let config = with(|c| c.assistant_avatar = "ftp://x/a.png".to_string());
        assert!(validate_field(Field::AssistantAvatar, &config).is_some());
    }

    // ==================== Cross-field rules ====================

    #[test]
    fn test_trigger_rules_apply_only_when_enabled() {
        let disabled = with(|c| {
            c.auto_trigger.message = "Hi".to_string();
            c.auto_trigger.delay = 0;
        });
        assert!(validate_document(&disabled).is_empty());

        let enabled = with(|c| {
            c.auto_trigger.enabled = true;
            c.auto_trigger.message = "Hi".to_string();
            c.auto_trigger.delay = 0;
        });
        let errors = validate_document(&enabled);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("autoTrigger.delay"),
            Some("Auto-trigger delay must be between 1 and 300 seconds")
        );
        assert!(errors.contains("autoTrigger.message"));
    }

    #[test]
    fn test_knowledge_base_source_limit() {
        let config = with(|c| c.knowledge_base = vec!["https://a.dev".to_string(); 21]);
        assert_eq!(
            validate_field(Field::KnowledgeBase, &config).as_deref(),
            Some("Knowledge base can have at most 20 sources")
        );
    }

    // ==================== Document pass ====================

    #[test]
    fn test_document_pass_collects_in_declaration_order() {
        let config = with(|c| {
            c.welcome_message = "Hi".to_string();
            c.widget_name = String::new();
            c.primary_color = "blue".to_string();
        });
        let errors = validate_document(&config);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first_field(), Some("widgetName"));
    }

    #[test]
    fn test_field_validation_is_idempotent() {
        let config = with(|c| c.primary_color = "blue".to_string());
        let first = validate_field(Field::PrimaryColor, &config);
        let second = validate_field(Field::PrimaryColor, &config);
        assert_eq!(first, second);
    }
}
