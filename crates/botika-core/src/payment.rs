//! # Payment Request
//!
//! What the cashier entered in the payment modal, and the rules it must
//! satisfy against the transaction total.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cash                          GCash / Maya / GoTyme                    │
//! │  ────                          ─────────────────────                    │
//! │  cash_in_hand required         reference_number required               │
//! │  cash_in_hand ≥ total          (provider transaction id)               │
//! │  change = cash − total         change = 0                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::checkout::BlockingReason;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::{validate_cash_in_hand, validate_reference_number};

/// Payment inputs for the current transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub cash_in_hand: Option<Money>,
}

impl PaymentRequest {
    /// A cash payment.
    pub fn cash(cash_in_hand: Money) -> Self {
        PaymentRequest {
            payment_method: PaymentMethod::Cash,
            reference_number: None,
            cash_in_hand: Some(cash_in_hand),
        }
    }

    /// An e-wallet payment with the provider's reference number.
    pub fn e_wallet(method: PaymentMethod, reference_number: impl Into<String>) -> Self {
        PaymentRequest {
            payment_method: method,
            reference_number: Some(reference_number.into()),
            cash_in_hand: None,
        }
    }

    /// Checks field formats and drops inputs the method does not use.
    ///
    /// Presence is NOT required here: an empty reference or a missing
    /// cash amount is a blocking reason at confirmation time, not a
    /// malformed input.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        if self.payment_method.is_cash() {
            if let Some(cash) = self.cash_in_hand {
                validate_cash_in_hand(cash)?;
            }
            return Ok(PaymentRequest {
                payment_method: PaymentMethod::Cash,
                reference_number: None,
                cash_in_hand: self.cash_in_hand,
            });
        }

        let reference_number = match self.reference_number.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(reference) => Some(validate_reference_number(reference)?),
        };

        Ok(PaymentRequest {
            payment_method: self.payment_method,
            reference_number,
            cash_in_hand: None,
        })
    }

    /// Checks the payment against the amount due.
    ///
    /// ```rust
    /// use botika_core::checkout::BlockingReason;
    /// use botika_core::money::Money;
    /// use botika_core::payment::PaymentRequest;
    ///
    /// let total = Money::from_pesos(840);
    /// assert!(matches!(
    ///     PaymentRequest::cash(Money::from_pesos(500)).check(total),
    ///     Err(BlockingReason::InsufficientCash { .. })
    /// ));
    /// assert!(PaymentRequest::cash(Money::from_pesos(1000)).check(total).is_ok());
    /// ```
    pub fn check(&self, total: Money) -> Result<(), BlockingReason> {
        if self.payment_method.is_cash() {
            let cash_in_hand = self.cash_in_hand.ok_or(BlockingReason::CashRequired)?;
            if cash_in_hand < total {
                return Err(BlockingReason::InsufficientCash {
                    total,
                    cash_in_hand,
                });
            }
            return Ok(());
        }

        let has_reference = self
            .reference_number
            .as_deref()
            .is_some_and(|reference| !reference.trim().is_empty());
        if !has_reference {
            return Err(BlockingReason::ReferenceRequired {
                method: self.payment_method,
            });
        }

        Ok(())
    }

    /// Change to hand back: `max(0, cash − total)` for cash, zero otherwise.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    /// use botika_core::payment::PaymentRequest;
    /// use botika_core::types::PaymentMethod;
    ///
    /// let total = Money::from_pesos(840);
    /// assert_eq!(PaymentRequest::cash(Money::from_pesos(1000)).change_due(total), Money::from_pesos(160));
    /// assert!(PaymentRequest::e_wallet(PaymentMethod::GCash, "1234").change_due(total).is_zero());
    /// ```
    pub fn change_due(&self, total: Money) -> Money {
        match (self.payment_method, self.cash_in_hand) {
            (PaymentMethod::Cash, Some(cash)) => (cash - total).floor_zero(),
            _ => Money::zero(),
        }
    }
}
