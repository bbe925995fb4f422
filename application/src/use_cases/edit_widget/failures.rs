//! Reconciliation of remote save failures.
//!
//! Turns a [`GatewayError`] into an error map update plus exactly one
//! user-facing message. Raw server text is never shown for conflicts.

use crate::ports::config_gateway::GatewayError;
use widgetdesk_domain::{ErrorMap, Field};

const DUPLICATE_NAME_FIELD_MESSAGE: &str = "A widget with this name already exists";
const CONFLICT_MESSAGE: &str = "This widget was changed elsewhere. Reload it and try again.";
const MISSING_REQUIRED_MESSAGE: &str = "Please fill in all required fields";
const INVALID_FIELDS_MESSAGE: &str = "Some fields are invalid. Review the highlighted fields.";
const GENERIC_SAVE_MESSAGE: &str = "Failed to save widget configuration";

/// Recognized reason a save was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailureKind {
    DuplicateName,
    Conflict,
    MissingRequired,
    InvalidFields,
    Other,
}

/// A classified save failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub kind: SaveFailureKind,
    /// Field errors to merge into the local map
    pub errors: ErrorMap,
    /// The single notification to show
    pub message: String,
}

impl SaveFailure {
    /// Classify `error` for a save of a widget named `widget_name`
    pub fn classify(error: &GatewayError, widget_name: &str) -> Self {
        match error {
            GatewayError::Conflict { message, errors } => {
                let map = ErrorMap::from_remote(errors);
                if map.contains(Field::WidgetName.path()) || mentions_duplicate_name(message) {
                    Self::duplicate_name(map, widget_name)
                } else {
                    Self {
                        kind: SaveFailureKind::Conflict,
                        errors: map,
                        message: CONFLICT_MESSAGE.to_string(),
                    }
                }
            }
            GatewayError::Validation { message, errors } => {
                let map = ErrorMap::from_remote(errors);
                let name_taken = map
                    .get(Field::WidgetName.path())
                    .is_some_and(mentions_duplicate);
                if name_taken {
                    return Self::duplicate_name(map, widget_name);
                }
                let missing_required = std::iter::once(message.as_str())
                    .chain(map.ordered().into_iter().map(|(_, m)| m))
                    .any(|m| m.to_lowercase().contains("required"));

                let (kind, text) = if missing_required && map.len() != 1 {
                    (SaveFailureKind::MissingRequired, MISSING_REQUIRED_MESSAGE.to_string())
                } else if let (1, Some(only)) = (map.len(), map.first_message()) {
                    (SaveFailureKind::InvalidFields, only.to_string())
                } else {
                    (SaveFailureKind::InvalidFields, INVALID_FIELDS_MESSAGE.to_string())
                };
                Self {
                    kind,
                    errors: map,
                    message: text,
                }
            }
            _ => Self {
                kind: SaveFailureKind::Other,
                errors: ErrorMap::new(),
                message: GENERIC_SAVE_MESSAGE.to_string(),
            },
        }
    }

    fn duplicate_name(mut errors: ErrorMap, widget_name: &str) -> Self {
        errors.insert(Field::WidgetName.path(), DUPLICATE_NAME_FIELD_MESSAGE);
        Self {
            kind: SaveFailureKind::DuplicateName,
            errors,
            message: format!(
                "A widget named \"{}\" already exists. Please choose a different name.",
                widget_name.trim()
            ),
        }
    }
}

fn mentions_duplicate(text: &str) -> bool {
    let text = text.to_lowercase();
    ["already exists", "already been taken", "taken", "duplicate", "unique"]
        .iter()
        .any(|needle| text.contains(needle))
}

fn mentions_duplicate_name(text: &str) -> bool {
    text.to_lowercase().contains("name") && mentions_duplicate(text)
}
