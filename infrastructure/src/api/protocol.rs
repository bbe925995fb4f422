//! Wire types of the widget configuration REST API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use widgetdesk_application::{ConfigId, FieldErrors, GatewayError, StoredConfig, WidgetConfigPayload};

/// Response body that may or may not be wrapped in `{"data": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Record identifier as the service sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(u64),
    Text(String),
}

impl From<RemoteId> for ConfigId {
    fn from(id: RemoteId) -> Self {
        match id {
            RemoteId::Number(n) => ConfigId::from(n),
            RemoteId::Text(s) => ConfigId::new(s),
        }
    }
}

/// A stored record: the document with its `id` alongside
#[derive(Debug, Deserialize)]
pub struct StoredResponse {
    pub id: RemoteId,
    #[serde(flatten)]
    pub config: WidgetConfigPayload,
}

impl From<StoredResponse> for StoredConfig {
    fn from(response: StoredResponse) -> Self {
        StoredConfig {
            id: response.id.into(),
            config: response.config,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DuplicateRequest<'a> {
    pub widget_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

/// Body of a rejected request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    message: Option<String>,
    errors: BTreeMap<String, Messages>,
}

impl ErrorBody {
    fn field_errors(self) -> (Option<String>, FieldErrors) {
        let errors = self
            .errors
            .into_iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    Messages::One(message) => vec![message],
                    Messages::Many(messages) => messages,
                };
                (field, messages)
            })
            .collect();
        (self.message, errors)
    }
}

/// Classify a non-success response.
///
/// Bodies that are not the documented JSON shape still produce an error
/// with the raw text (or the status reason) as its message.
pub fn rejection(status: u16, reason: Option<&str>, raw: &str) -> GatewayError {
    let (message, errors) = match serde_json::from_str::<ErrorBody>(raw) {
        Ok(body) => body.field_errors(),
        Err(_) => {
            let text = raw.trim();
            ((!text.is_empty()).then(|| truncate(text, 200)), FieldErrors::new())
        }
    };
    let message = message
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    GatewayError::from_status(status, message, errors)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<WidgetConfigPayload> =
            serde_json::from_str(r#"{"data": {"widget_name": "Wrapped Bot"}}"#).unwrap();
        assert_eq!(wrapped.into_inner().widget_name, "Wrapped Bot");

        let bare: Envelope<WidgetConfigPayload> =
            serde_json::from_str(r#"{"widget_name": "Bare Bot"}"#).unwrap();
        assert_eq!(bare.into_inner().widget_name, "Bare Bot");
    }

    #[test]
    fn test_stored_response_with_numeric_id() {
        let response: StoredResponse = serde_json::from_str(
            r#"{"id": 42, "widget_name": "Support Bot", "width": 400}"#,
        )
        .unwrap();
        let stored = StoredConfig::from(response);
        assert_eq!(stored.id, ConfigId::from(42));
        assert_eq!(stored.config.widget_name, "Support Bot");
        assert_eq!(stored.config.width, 400);
    }

    #[test]
    fn test_stored_response_with_text_id() {
        let response: StoredResponse =
            serde_json::from_str(r#"{"id": "wc_9f2", "widget_name": "Bot"}"#).unwrap();
        assert_eq!(StoredConfig::from(response).id, ConfigId::from("wc_9f2"));
    }

    #[test]
    fn test_validation_rejection_keeps_field_errors() {
        let raw = r#"{"message": "The given data was invalid.",
                      "errors": {"widget_name": ["has already been taken"], "width": "too wide"}}"#;
        let error = rejection(422, Some("Unprocessable Entity"), raw);
        let GatewayError::Validation { message, errors } = error else {
            panic!("expected validation error");
        };
        assert_eq!(message, "The given data was invalid.");
        assert_eq!(errors["widget_name"], vec!["has already been taken"]);
        assert_eq!(errors["width"], vec!["too wide"]);
    }

    #[test]
    fn test_conflict_rejection() {
        let error = rejection(409, Some("Conflict"), r#"{"message": "Name taken"}"#);
        assert!(matches!(error, GatewayError::Conflict { ref message, .. } if message == "Name taken"));
    }

    #[test]
    fn test_non_json_body_falls_back_to_text_or_reason() {
        let error = rejection(502, Some("Bad Gateway"), "<html>upstream down</html>");
        assert_eq!(
            error,
            GatewayError::Status {
                status: 502,
                message: "<html>upstream down</html>".to_string()
            }
        );

        let error = rejection(500, Some("Internal Server Error"), "");
        assert_eq!(
            error,
            GatewayError::Status {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );

        let error = rejection(599, None, "   ");
        assert_eq!(error.to_string(), "Request failed with status 599: HTTP 599");
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(300);
        let truncated = truncate(&long, 200);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }
}
