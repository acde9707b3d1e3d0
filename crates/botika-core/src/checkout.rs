//! # Checkout Gate & State Machine
//!
//! Decides whether the cashier may confirm a payment, and tracks the
//! payment modal through submission.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  open   ┌──────────────────┐  begin_validation  ┌─────────┐ │
//! │   │ Idle │───────►│ PaymentModalOpen │───────────────────►│Validating│ │
//! │   └──────┘◄───────└──────────────────┘◄───────────────────└────┬────┘ │
//! │      ▲     cancel          ▲              gate blocked         │       │
//! │      │                     │                                   │ ok    │
//! │      │                     │ settle                            ▼       │
//! │      │               ┌─────┴─────┐    fail    ┌────────────────────┐   │
//! │      │               │  Failure  │◄───────────│     Processing     │   │
//! │      │               └───────────┘            └─────────┬──────────┘   │
//! │      │   settle      ┌───────────┐   succeed            │              │
//! │      └───────────────│  Success  │◄─────────────────────┘              │
//! │                      └───────────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failure goes back to the open modal with the error message. Success goes
//! back to Idle; the caller clears the cart.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::{Cart, StockIssue};
use crate::discount::DiscountSelection;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::PaymentRequest;
use crate::summary::TransactionSummary;
use crate::types::{CheckoutSettings, PaymentMethod, TransactionReceipt};

// =============================================================================
// Blocking Reasons
// =============================================================================

/// Why the payment cannot be confirmed yet.
///
/// Every reason is recoverable: the cashier corrects the input and retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlockingReason {
    EmptyCart,
    StockExceeded {
        items: Vec<StockIssue>,
    },
    SeniorIdMissing,
    CashRequired,
    InsufficientCash {
        total: Money,
        #[serde(rename = "cashInHand")]
        cash_in_hand: Money,
    },
    ReferenceRequired {
        method: PaymentMethod,
    },
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockingReason::EmptyCart => write!(f, "Cart is empty"),
            BlockingReason::StockExceeded { items } => {
                let details: Vec<String> = items
                    .iter()
                    .map(|issue| {
                        format!(
                            "{}: {} requested, {} in stock",
                            issue.name, issue.requested, issue.available
                        )
                    })
                    .collect();
                write!(f, "Quantity exceeds available stock ({})", details.join("; "))
            }
            BlockingReason::SeniorIdMissing => {
                write!(f, "Senior citizen ID is required for this discount")
            }
            BlockingReason::CashRequired => write!(f, "Enter the cash received"),
            BlockingReason::InsufficientCash {
                total,
                cash_in_hand,
            } => write!(f, "Insufficient cash: {} received, {} due", cash_in_hand, total),
            BlockingReason::ReferenceRequired { method } => {
                write!(f, "Reference number is required for {} payments", method)
            }
        }
    }
}

// =============================================================================
// Checkout Gate
// =============================================================================

/// Everything the payment modal needs to render its totals and its
/// confirm button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutGate {
    pub summary: TransactionSummary,
    pub can_confirm: bool,
    pub blocking_reasons: Vec<BlockingReason>,
    /// Human-readable form of `blocking_reasons`, same order.
    pub messages: Vec<String>,
    pub change_amount: Money,
    pub has_stock_issues: bool,
    pub is_senior_id_missing: bool,
}

impl CheckoutGate {
    /// Evaluates every checkout rule against the current inputs.
    ///
    /// ```rust
    /// use botika_core::cart::Cart;
    /// use botika_core::checkout::{BlockingReason, CheckoutGate};
    /// use botika_core::discount::DiscountSelection;
    /// use botika_core::payment::PaymentRequest;
    /// use botika_core::types::CheckoutSettings;
    ///
    /// let gate = CheckoutGate::evaluate(
    ///     &Cart::new(),
    ///     &DiscountSelection::none(),
    ///     &PaymentRequest::default(),
    ///     &CheckoutSettings::default(),
    /// );
    /// assert!(!gate.can_confirm);
    /// assert_eq!(gate.blocking_reasons, vec![BlockingReason::EmptyCart]);
    /// ```
    pub fn evaluate(
        cart: &Cart,
        discount: &DiscountSelection,
        payment: &PaymentRequest,
        settings: &CheckoutSettings,
    ) -> Self {
        let summary = TransactionSummary::compute(cart, discount, settings);
        let mut reasons = Vec::new();

        if cart.is_empty() {
            reasons.push(BlockingReason::EmptyCart);
        } else {
            let stock_issues = cart.stock_issues();
            if !stock_issues.is_empty() {
                reasons.push(BlockingReason::StockExceeded {
                    items: stock_issues,
                });
            }
            if discount.is_senior_id_missing() {
                reasons.push(BlockingReason::SeniorIdMissing);
            }
            if let Err(reason) = payment.check(summary.total) {
                reasons.push(reason);
            }
        }

        CheckoutGate {
            summary,
            can_confirm: reasons.is_empty(),
            messages: reasons.iter().map(ToString::to_string).collect(),
            blocking_reasons: reasons,
            change_amount: payment.change_due(summary.total),
            has_stock_issues: cart.has_stock_issues(),
            is_senior_id_missing: discount.is_senior_id_missing(),
        }
    }

    /// The message shown when confirmation is refused.
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}

// =============================================================================
// State Machine
// =============================================================================

/// Where the checkout currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum CheckoutPhase {
    #[default]
    Idle,
    PaymentModalOpen {
        /// Last validation or submission error, shown inline in the modal.
        error: Option<String>,
    },
    Validating,
    Processing,
    Success {
        receipt: TransactionReceipt,
    },
    Failure {
        message: String,
    },
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::PaymentModalOpen { .. } => "in the payment modal",
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::Processing => "processing",
            CheckoutPhase::Success { .. } => "completed",
            CheckoutPhase::Failure { .. } => "failed",
        };
        f.write_str(name)
    }
}

/// Drives [`CheckoutPhase`] transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    /// A flow in the Idle phase.
    pub fn new() -> Self {
        CheckoutFlow::default()
    }

    /// Current phase.
    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// True while the payment modal is on screen (including in-flight states).
    pub fn is_modal_open(&self) -> bool {
        !matches!(self.phase, CheckoutPhase::Idle)
    }

    /// True while a submission is being validated or processed.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            CheckoutPhase::Validating | CheckoutPhase::Processing
        )
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidCheckoutTransition {
            state: self.phase.to_string(),
            action: action.to_string(),
        }
    }

    /// Idle → PaymentModalOpen.
    ///
    /// Refused for an empty cart or a cart with stock issues.
    pub fn open(&mut self, cart: &Cart) -> CoreResult<()> {
        if self.phase != CheckoutPhase::Idle {
            return Err(self.invalid("open payment"));
        }
        if cart.is_empty() {
            return Err(CoreError::CheckoutBlocked {
                reason: BlockingReason::EmptyCart.to_string(),
            });
        }
        let issues = cart.stock_issues();
        if !issues.is_empty() {
            return Err(CoreError::CheckoutBlocked {
                reason: BlockingReason::StockExceeded { items: issues }.to_string(),
            });
        }

        self.phase = CheckoutPhase::PaymentModalOpen { error: None };
        Ok(())
    }

    /// PaymentModalOpen → Idle.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.phase {
            CheckoutPhase::PaymentModalOpen { .. } => {
                self.phase = CheckoutPhase::Idle;
                Ok(())
            }
            _ => Err(self.invalid("cancel payment")),
        }
    }

    /// PaymentModalOpen → Validating.
    pub fn begin_validation(&mut self) -> CoreResult<()> {
        match self.phase {
            CheckoutPhase::PaymentModalOpen { .. } => {
                self.phase = CheckoutPhase::Validating;
                Ok(())
            }
            _ => Err(self.invalid("confirm payment")),
        }
    }

    /// Validating → Processing when the gate allows it, otherwise back to
    /// PaymentModalOpen with the first blocking message.
    ///
    /// Returns whether processing may start.
    pub fn complete_validation(&mut self, gate: &CheckoutGate) -> CoreResult<bool> {
        if self.phase != CheckoutPhase::Validating {
            return Err(self.invalid("finish validation"));
        }

        if gate.can_confirm {
            self.phase = CheckoutPhase::Processing;
            Ok(true)
        } else {
            self.phase = CheckoutPhase::PaymentModalOpen {
                error: gate.first_message().map(str::to_string),
            };
            Ok(false)
        }
    }

    /// [`begin_validation`](Self::begin_validation) followed by
    /// [`complete_validation`](Self::complete_validation).
    pub fn validate(&mut self, gate: &CheckoutGate) -> CoreResult<bool> {
        self.begin_validation()?;
        self.complete_validation(gate)
    }

    /// Processing → Success.
    pub fn succeed(&mut self, receipt: TransactionReceipt) -> CoreResult<()> {
        if self.phase != CheckoutPhase::Processing {
            return Err(self.invalid("record success"));
        }
        self.phase = CheckoutPhase::Success { receipt };
        Ok(())
    }

    /// Processing → Failure.
    pub fn fail(&mut self, message: impl Into<String>) -> CoreResult<()> {
        if self.phase != CheckoutPhase::Processing {
            return Err(self.invalid("record failure"));
        }
        self.phase = CheckoutPhase::Failure {
            message: message.into(),
        };
        Ok(())
    }

    /// Success → Idle (returns the receipt), Failure → PaymentModalOpen.
    pub fn settle(&mut self) -> CoreResult<Option<TransactionReceipt>> {
        match std::mem::take(&mut self.phase) {
            CheckoutPhase::Success { receipt } => {
                self.phase = CheckoutPhase::Idle;
                Ok(Some(receipt))
            }
            CheckoutPhase::Failure { message } => {
                self.phase = CheckoutPhase::PaymentModalOpen {
                    error: Some(message),
                };
                Ok(None)
            }
            other => {
                self.phase = other;
                Err(self.invalid("settle checkout"))
            }
        }
    }

    /// Returns to Idle from any phase. Used when the session is reset.
    pub fn reset(&mut self) {
        self.phase = CheckoutPhase::Idle;
    }
}
