//! # Checkout State
//!
//! The payment modal's state machine plus the discount and payment inputs
//! the cashier has entered for the current transaction.

use std::sync::{Arc, Mutex, PoisonError};

use botika_core::{CheckoutFlow, DiscountSelection, PaymentRequest};
use serde::Serialize;
use uuid::Uuid;

/// Inputs and progress of the transaction being checked out.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub flow: CheckoutFlow,
    pub discount: DiscountSelection,
    pub payment: PaymentRequest,

    /// Id sent with every submission attempt of this transaction. Kept
    /// across a failed attempt so a retry is recognized by the server.
    #[serde(skip)]
    pub pending_transaction_id: Option<Uuid>,
}

impl CheckoutSession {
    /// The id for the next submission, allocating one if needed.
    pub fn transaction_id(&mut self) -> Uuid {
        *self.pending_transaction_id.get_or_insert_with(Uuid::new_v4)
    }

    /// Back to a fresh transaction: Idle, no discount, default payment.
    pub fn reset(&mut self) {
        self.flow.reset();
        self.discount = DiscountSelection::none();
        self.payment = PaymentRequest::default();
        self.pending_transaction_id = None;
    }
}

/// Thread-safe wrapper around the checkout session.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    inner: Arc<Mutex<CheckoutSession>>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CheckoutSession) -> R,
    {
        let session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSession) -> R,
    {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botika_core::{CheckoutPhase, Money};

    #[test]
    fn test_transaction_id_is_stable_until_reset() {
        let mut session = CheckoutSession::default();
        let first = session.transaction_id();
        assert_eq!(session.transaction_id(), first);

        session.reset();
        assert_ne!(session.transaction_id(), first);
    }

    #[test]
    fn test_reset_clears_inputs() {
        let state = CheckoutState::new();
        state.with_session_mut(|s| {
            s.payment = PaymentRequest::cash(Money::from_pesos(100));
            s.discount.set_special_discount(Money::from_pesos(5)).unwrap();
            s.reset();
        });

        state.with_session(|s| {
            assert_eq!(s.flow.phase(), &CheckoutPhase::Idle);
            assert!(s.discount.special_discount.is_zero());
            assert!(s.payment.cash_in_hand.is_none());
        });
    }
}
