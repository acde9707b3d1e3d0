//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Botika POS                             │
//! │                                                                         │
//! │  Checkout UI                 Register                                   │
//! │  ───────────                 ────────                                   │
//! │                                                                         │
//! │  addToCart('17', 3)                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend Error? ─── ClientError::Api { .. } ────────┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Rule Violation? ─── CoreError::QuantityTooLarge ── ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code = "VALIDATION_ERROR"                                            │
//! │  e.message = "Quantity 1000 exceeds maximum allowed (999)"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A blocked confirmation is NOT an error: it comes back as a normal
//! response carrying the gate's messages.

use botika_api::ClientError;
use botika_core::{CoreError, ValidationError};
use serde::Serialize;

/// Error returned from register commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Item not found: 17"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item, discount or cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation failed
    CartError,

    /// Checkout cannot make the requested move
    CheckoutError,

    /// The REST backend refused or could not be reached
    BackendError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a checkout error.
    pub fn checkout(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CheckoutError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotInCart(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::InvalidCheckoutTransition { .. } | CoreError::CheckoutBlocked { .. } => {
                ApiError::checkout(err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { .. } => ApiError::new(ErrorCode::BackendError, err.user_message()),
            ClientError::Unauthorized => {
                ApiError::new(ErrorCode::BackendError, "Not authorized to reach the POS server")
            }
            ClientError::NotFound(_) => {
                tracing::error!("Backend endpoint not found: {}", err);
                ApiError::new(ErrorCode::BackendError, "POS server endpoint not found")
            }
            ClientError::Http(e) => {
                tracing::error!("Backend request failed: {}", e);
                ApiError::new(ErrorCode::BackendError, "Could not reach the POS server")
            }
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                tracing::error!("Unexpected backend response: {}", err);
                ApiError::new(ErrorCode::Internal, "The POS server sent an unexpected response")
            }
            ClientError::Config(message) => {
                ApiError::new(ErrorCode::Internal, format!("Invalid API configuration: {}", message))
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Item", "17");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: 17");
    }

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        });
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = ApiError::from(CoreError::InvalidCheckoutTransition {
            state: "idle".to_string(),
            action: "confirm payment".to_string(),
        });
        assert_eq!(err.code, ErrorCode::CheckoutError);
        assert_eq!(err.message, "Cannot confirm payment while checkout is idle");
    }

    #[test]
    fn test_client_error_mapping() {
        let err = ApiError::from(ClientError::Api {
            status: 422,
            message: "Out of stock".to_string(),
        });
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.message, "Out of stock");

        let err = ApiError::from(ClientError::InvalidResponse("bad".to_string()));
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
