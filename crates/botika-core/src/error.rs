//! # Error Types
//!
//! Domain-specific error types for botika-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  botika-core errors (this file)                                        │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  botika-api errors (separate crate)                                    │
//! │  └── ClientError      - REST call failures                             │
//! │                                                                         │
//! │  Register errors (in app)                                              │
//! │  └── ApiError         - What the checkout UI sees (serialized)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Checkout UI            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Blocking reasons (insufficient cash, missing reference, ...) are NOT
//! errors. They live in [`crate::checkout::BlockingReason`] because the
//! cashier fixes the input and retries; nothing failed.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id is not a line in the cart.
    #[error("Item {0} is not in the cart")]
    ItemNotInCart(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The checkout state machine was asked for a move it cannot make.
    ///
    /// ## When This Occurs
    /// - Confirming a payment while the modal is closed
    /// - Opening the payment modal while a submission is in flight
    /// - Settling a checkout that has not finished processing
    #[error("Cannot {action} while checkout is {state}")]
    InvalidCheckoutTransition { state: String, action: String },

    /// The payment modal cannot open for this cart.
    #[error("Cannot open payment: {reason}")]
    CheckoutBlocked { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., "12.345" as an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
