//! Client error types

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Shown when a failed call carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Transaction failed. Please try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error status
    #[error("Server error {status}: {message}")]
    Api { status: u16, message: String },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad or unreadable client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// The text to put in the payment modal's inline alert.
    ///
    /// The server's own message when it sent one, the generic fallback
    /// otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Builds the error for a non-success response.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        if let Some(message) = server_message(body) {
            return ClientError::Api {
                status: status.as_u16(),
                message,
            };
        }

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(body.trim().to_string()),
            _ => ClientError::Api {
                status: status.as_u16(),
                message: String::new(),
            },
        }
    }
}

/// Error bodies seen from the backend: `{"message": ...}`,
/// `{"error": ...}` or `{"detail": ...}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    detail: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    [parsed.message, parsed.error, parsed.detail]
        .into_iter()
        .flatten()
        .map(|m| m.trim().to_string())
        .find(|m| !m.is_empty())
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_surfaced() {
        let err = ClientError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Item Biogesic is out of stock"}"#,
        );
        assert!(matches!(err, ClientError::Api { status: 422, .. }));
        assert_eq!(err.user_message(), "Item Biogesic is out of stock");
    }

    #[test]
    fn test_alternate_error_keys() {
        let err = ClientError::from_response(StatusCode::BAD_REQUEST, r#"{"error": "Bad payload"}"#);
        assert_eq!(err.user_message(), "Bad payload");

        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message": "  ", "detail": "Invalid reference"}"#,
        );
        assert_eq!(err.user_message(), "Invalid reference");
    }

    #[test]
    fn test_fallback_message() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "<html>502</html>");
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ClientError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ClientError::InvalidResponse("missing receiptNumber".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
