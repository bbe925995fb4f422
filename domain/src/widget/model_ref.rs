//! Recognition of AI model identifiers referenced by a widget.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier families the widget runtime knows how to route
static RECOGNIZED_MODELS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^gpt-4o(-mini)?(-\d{4}-\d{2}-\d{2})?$",
        r"^gpt-4(-turbo)?(-\d{4}-\d{2}-\d{2}|-\d{4})?$",
        r"^gpt-3\.5-turbo(-\d{4}-\d{2}-\d{2}|-\d{4})?$",
        r"^claude-3-(opus|sonnet|haiku)(-\d{8}|-latest)?$",
        r"^claude-3-5-(sonnet|haiku)(-\d{8}|-latest)?$",
        r"^claude-3-7-sonnet(-\d{8}|-latest)?$",
        r"^gemini-(1\.5|2\.0)-(pro|flash)(-latest|-\d{3})?$",
        r"^mistral-(small|medium|large)-latest$",
        r"^llama-3(\.[1-3])?-\d{1,3}b-instruct$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid model pattern"))
    .collect()
});

/// Outcome of checking the widget's model reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReference {
    /// No model selected; the widget runs in fallback mode
    Absent,
    /// Present but not a recognized identifier
    Unrecognized(String),
    /// Present and recognized
    Recognized(String),
}

impl ModelReference {
    pub fn classify(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() {
            ModelReference::Absent
        } else if RECOGNIZED_MODELS.iter().any(|re| re.is_match(id)) {
            ModelReference::Recognized(id.to_string())
        } else {
            ModelReference::Unrecognized(id.to_string())
        }
    }
}
