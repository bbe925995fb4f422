//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

impl DomainError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field path this error is attributed to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::InvalidValue { field, .. } => Some(field),
            DomainError::UnknownField(_) | DomainError::UnknownSection(_) => None,
        }
    }
}
