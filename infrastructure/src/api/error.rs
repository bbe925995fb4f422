//! Error types for the HTTP adapter

use thiserror::Error;
use widgetdesk_application::GatewayError;

/// Result type alias for HTTP adapter internals
pub type Result<T, E = HttpGatewayError> = std::result::Result<T, E>;

/// Failures below the gateway port, before they are classified
#[derive(Error, Debug)]
pub enum HttpGatewayError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    Parse {
        error: serde_json::Error,
        raw: String,
    },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<HttpGatewayError> for GatewayError {
    fn from(error: HttpGatewayError) -> Self {
        match error {
            HttpGatewayError::Client(e) if e.is_timeout() => GatewayError::Timeout,
            HttpGatewayError::Client(e) if e.is_connect() || e.is_request() => {
                GatewayError::ConnectionError(e.to_string())
            }
            HttpGatewayError::Client(e) => GatewayError::InvalidResponse(e.to_string()),
            HttpGatewayError::Parse { error, .. } => {
                GatewayError::InvalidResponse(error.to_string())
            }
            HttpGatewayError::InvalidBaseUrl(url) => {
                GatewayError::ConnectionError(format!("invalid base URL: {url}"))
            }
        }
    }
}
