//! # Checkout Commands
//!
//! Discount and payment inputs, the confirmation gate and the payment
//! modal.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_payment ──► PaymentModalOpen ◄──────────────────────────┐        │
//! │                        │      │                               │        │
//! │          cancel_payment│      │confirm_payment                │        │
//! │                        ▼      ▼                               │        │
//! │                      Idle   Validating ──blocked (messages)──►│        │
//! │                               │                               │        │
//! │                               ▼                               │        │
//! │                           Processing ── POST /transactions    │        │
//! │                            │       │                          │        │
//! │                         Success  Failure ── server message ───┘        │
//! │                            │                                            │
//! │                            ▼                                            │
//! │          Idle, cart cleared, inputs reset, receipt returned             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use botika_api::{PosBackend, TransactionRequest, GENERIC_FAILURE_MESSAGE};
use botika_core::{
    CheckoutGate, CheckoutPhase, CheckoutSettings, DiscountSelection, Money, PaymentMethod,
    PaymentRequest, TransactionReceipt,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, CatalogState, CheckoutState, ConfigState};

/// Payment inputs as typed by the cashier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Pesos as typed ("1000", "1000.50"). Empty means not entered yet.
    #[serde(default)]
    pub cash_in_hand: Option<String>,
}

/// Outcome of `confirm_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub phase: CheckoutPhase,
    /// Present only when the transaction was recorded.
    pub receipt: Option<TransactionReceipt>,
    /// Why confirmation did not go through, for the modal's inline alert.
    pub messages: Vec<String>,
}

// =============================================================================
// Guards
// =============================================================================

/// Refuses input changes while a payment is being validated or submitted.
pub(crate) fn ensure_not_busy(checkout: &CheckoutState) -> Result<(), ApiError> {
    checkout.with_session(|s| {
        if s.flow.is_busy() {
            Err(ApiError::checkout(format!(
                "Cannot change the transaction while checkout is {}",
                s.flow.phase()
            )))
        } else {
            Ok(())
        }
    })
}

/// Refuses cart changes while the payment modal is open.
pub(crate) fn ensure_cart_editable(checkout: &CheckoutState) -> Result<(), ApiError> {
    checkout.with_session(|s| {
        if s.flow.is_modal_open() {
            Err(ApiError::checkout(format!(
                "Cannot change the cart while checkout is {}",
                s.flow.phase()
            )))
        } else {
            Ok(())
        }
    })
}

fn current_settings(catalog: &CatalogState, config: &ConfigState) -> CheckoutSettings {
    catalog.settings_or(config.default_settings())
}

// =============================================================================
// Discount Inputs
// =============================================================================

/// Selects a regular discount policy by id.
pub fn select_discount(
    catalog: &CatalogState,
    checkout: &CheckoutState,
    discount_id: &str,
) -> Result<DiscountSelection, ApiError> {
    debug!(discount_id = %discount_id, "select_discount command");

    ensure_not_busy(checkout)?;

    let discount = catalog
        .find_discount(discount_id)
        .ok_or_else(|| ApiError::not_found("Discount", discount_id))?;

    Ok(checkout.with_session_mut(|s| {
        s.discount.select(&discount);
        s.discount.clone()
    }))
}

/// Removes the regular discount (and the senior ID with it).
pub fn clear_discount(checkout: &CheckoutState) -> Result<DiscountSelection, ApiError> {
    debug!("clear_discount command");

    ensure_not_busy(checkout)?;

    Ok(checkout.with_session_mut(|s| {
        s.discount.clear_regular();
        s.discount.clone()
    }))
}

/// Sets the senior citizen ID. An empty string clears it.
pub fn set_senior_id(checkout: &CheckoutState, senior_id: &str) -> Result<DiscountSelection, ApiError> {
    debug!("set_senior_id command");

    ensure_not_busy(checkout)?;

    checkout.with_session_mut(|s| {
        s.discount.set_senior_id(senior_id)?;
        Ok::<_, ApiError>(s.discount.clone())
    })
}

/// Sets the flat special discount from typed pesos. Empty means zero.
pub fn set_special_discount(checkout: &CheckoutState, amount: &str) -> Result<DiscountSelection, ApiError> {
    debug!(amount = %amount, "set_special_discount command");

    ensure_not_busy(checkout)?;

    let amount = if amount.trim().is_empty() {
        Money::zero()
    } else {
        Money::parse(amount)?
    };

    checkout.with_session_mut(|s| {
        s.discount.set_special_discount(amount)?;
        Ok::<_, ApiError>(s.discount.clone())
    })
}

// =============================================================================
// Payment Inputs
// =============================================================================

/// Replaces the payment inputs.
///
/// Formats are checked here; whether the payment covers the total is the
/// gate's job.
pub fn set_payment(checkout: &CheckoutState, input: PaymentInput) -> Result<PaymentRequest, ApiError> {
    debug!(method = %input.payment_method, "set_payment command");

    ensure_not_busy(checkout)?;

    let cash_in_hand = match input.cash_in_hand.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(cash) => Some(Money::parse(cash)?),
    };

    let payment = PaymentRequest {
        payment_method: input.payment_method,
        reference_number: input.reference_number,
        cash_in_hand,
    }
    .normalized()?;

    Ok(checkout.with_session_mut(|s| {
        s.payment = payment;
        s.payment.clone()
    }))
}

// =============================================================================
// Gate & Payment Modal
// =============================================================================

/// Totals, change and whether Confirm is enabled, for the current inputs.
pub fn get_checkout_gate(
    cart: &CartState,
    checkout: &CheckoutState,
    catalog: &CatalogState,
    config: &ConfigState,
) -> CheckoutGate {
    debug!("get_checkout_gate command");

    let settings = current_settings(catalog, config);
    let snapshot = cart.snapshot();
    checkout.with_session(|s| CheckoutGate::evaluate(&snapshot, &s.discount, &s.payment, &settings))
}

/// Opens the payment modal.
///
/// Refused for an empty cart or one with stock issues.
pub fn open_payment(cart: &CartState, checkout: &CheckoutState) -> Result<CheckoutPhase, ApiError> {
    debug!("open_payment command");

    let snapshot = cart.snapshot();
    checkout.with_session_mut(|s| {
        s.flow.open(&snapshot)?;
        Ok::<_, ApiError>(s.flow.phase().clone())
    })
}

/// Closes the payment modal without submitting.
pub fn cancel_payment(checkout: &CheckoutState) -> Result<CheckoutPhase, ApiError> {
    debug!("cancel_payment command");

    checkout.with_session_mut(|s| {
        s.flow.cancel()?;
        s.pending_transaction_id = None;
        Ok::<_, ApiError>(s.flow.phase().clone())
    })
}

enum Prepared {
    Blocked(CheckoutGate),
    Submit(TransactionRequest),
}

/// Returns the flow to the payment modal if a submission is dropped
/// while Processing. The pending transaction id is kept for the retry.
struct InFlight<'a> {
    checkout: &'a CheckoutState,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.checkout.with_session_mut(|s| {
            if matches!(s.flow.phase(), CheckoutPhase::Processing) {
                warn!("Transaction submission abandoned before the server answered");
                if s.flow.fail(GENERIC_FAILURE_MESSAGE).is_ok() {
                    let _ = s.flow.settle();
                }
            }
        });
    }
}

/// Validates, submits and settles the transaction.
///
/// ## Outcomes
/// - Blocked: modal stays open, `messages` lists every blocking reason
/// - Recorded: cart cleared, inputs reset, `receipt` returned
/// - Rejected / unreachable server: modal stays open with the server's
///   message or the generic fallback, cart untouched
pub async fn confirm_payment(
    backend: &dyn PosBackend,
    cart: &CartState,
    checkout: &CheckoutState,
    catalog: &CatalogState,
    config: &ConfigState,
) -> Result<ConfirmResponse, ApiError> {
    debug!("confirm_payment command");

    let settings = current_settings(catalog, config);
    let snapshot = cart.snapshot();

    let prepared = checkout.with_session_mut(|s| {
        let gate = CheckoutGate::evaluate(&snapshot, &s.discount, &s.payment, &settings);
        if !s.flow.validate(&gate)? {
            return Ok::<Prepared, ApiError>(Prepared::Blocked(gate));
        }
        let id = s.transaction_id();
        Ok(Prepared::Submit(TransactionRequest::new(
            id,
            &snapshot,
            &s.discount,
            &s.payment,
            &gate.summary,
        )))
    })?;

    let request = match prepared {
        Prepared::Blocked(gate) => {
            warn!(reasons = ?gate.messages, "Payment confirmation blocked");
            return Ok(ConfirmResponse {
                phase: checkout.with_session(|s| s.flow.phase().clone()),
                receipt: None,
                messages: gate.messages,
            });
        }
        Prepared::Submit(request) => request,
    };

    let mut in_flight = InFlight {
        checkout,
        settled: false,
    };
    let result = backend.submit_transaction(&request).await;
    in_flight.settled = true;

    // The cart is cleared under the session lock so no edit lands between
    // the flow going Idle and the clear.
    let response = checkout.with_session_mut(|s| match result {
        Ok(receipt) => {
            s.flow.succeed(receipt)?;
            cart.with_cart_mut(|c| c.clear());
            let receipt = s.flow.settle()?;
            s.reset();
            Ok::<ConfirmResponse, ApiError>(ConfirmResponse {
                phase: s.flow.phase().clone(),
                receipt,
                messages: Vec::new(),
            })
        }
        Err(err) => {
            warn!(
                client_transaction_id = %request.client_transaction_id,
                error = %err,
                "Transaction submission failed"
            );
            let message = err.user_message();
            s.flow.fail(message.clone())?;
            s.flow.settle()?;
            Ok(ConfirmResponse {
                phase: s.flow.phase().clone(),
                receipt: None,
                messages: vec![message],
            })
        }
    })?;

    if let Some(receipt) = &response.receipt {
        info!(
            receipt_number = %receipt.receipt_number,
            total = %receipt.total_amount,
            method = %receipt.payment_method,
            change = %receipt.change_amount,
            "Transaction recorded"
        );
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, get_cart};
    use crate::commands::testing::{FakeBackend, Register};
    use crate::error::ErrorCode;
    use botika_api::ClientError;

    fn cash(amount: &str) -> PaymentInput {
        PaymentInput {
            payment_method: PaymentMethod::Cash,
            reference_number: None,
            cash_in_hand: Some(amount.to_string()),
        }
    }

    /// 4 × ₱250 amoxicillin, senior discount with ID, ₱50 special.
    async fn worked_example(backend: &FakeBackend) -> Register {
        let r = Register::loaded(backend).await;
        add_to_cart(&r.catalog, &r.cart, &r.checkout, "amox", Some(4)).unwrap();
        select_discount(&r.catalog, &r.checkout, "1").unwrap();
        set_senior_id(&r.checkout, "OSCA-12345").unwrap();
        set_special_discount(&r.checkout, "50").unwrap();
        r
    }

    #[tokio::test]
    async fn test_gate_reflects_inputs() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;

        let gate = get_checkout_gate(&r.cart, &r.checkout, &r.catalog, &r.config);
        assert_eq!(gate.summary.subtotal, Money::from_pesos(1000));
        assert_eq!(gate.summary.regular_discount, Money::from_pesos(200));
        assert_eq!(gate.summary.vat, Money::from_pesos(90));
        assert_eq!(gate.summary.total, Money::from_pesos(840));
        assert!(!gate.can_confirm);

        set_payment(&r.checkout, cash("1000")).unwrap();
        let gate = get_checkout_gate(&r.cart, &r.checkout, &r.catalog, &r.config);
        assert!(gate.can_confirm);
        assert_eq!(gate.change_amount, Money::from_pesos(160));
    }

    #[tokio::test]
    async fn test_senior_id_required() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_senior_id(&r.checkout, "").unwrap();
        set_payment(&r.checkout, cash("1000")).unwrap();

        let gate = get_checkout_gate(&r.cart, &r.checkout, &r.catalog, &r.config);
        assert!(gate.is_senior_id_missing);
        assert!(!gate.can_confirm);

        // Switching to a non-senior policy lifts the requirement.
        select_discount(&r.catalog, &r.checkout, "2").unwrap();
        let gate = get_checkout_gate(&r.cart, &r.checkout, &r.catalog, &r.config);
        assert!(gate.can_confirm);
    }

    #[tokio::test]
    async fn test_confirm_records_transaction() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("1000")).unwrap();

        open_payment(&r.cart, &r.checkout).unwrap();
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();

        let receipt = response.receipt.expect("receipt");
        assert_eq!(receipt.total_amount, Money::from_pesos(840));
        assert_eq!(receipt.change_amount, Money::from_pesos(160));
        assert_eq!(response.phase, CheckoutPhase::Idle);
        assert!(response.messages.is_empty());

        let submitted = backend.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].total_amount, "840.00");
        assert_eq!(submitted[0].senior_id.as_deref(), Some("OSCA-12345"));

        assert!(get_cart(&r.cart).items.is_empty());
        r.checkout.with_session(|s| {
            assert!(!s.discount.has_regular());
            assert!(s.discount.special_discount.is_zero());
            assert!(s.payment.cash_in_hand.is_none());
            assert!(s.pending_transaction_id.is_none());
        });
    }

    #[tokio::test]
    async fn test_insufficient_cash_is_blocked() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("500")).unwrap();

        open_payment(&r.cart, &r.checkout).unwrap();
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();

        assert!(response.receipt.is_none());
        assert_eq!(
            response.messages,
            vec!["Insufficient cash: ₱500.00 received, ₱840.00 due".to_string()]
        );
        assert!(matches!(
            response.phase,
            CheckoutPhase::PaymentModalOpen { error: Some(_) }
        ));
        assert!(backend.submissions().is_empty());
        assert_eq!(get_cart(&r.cart).item_count, 1);
    }

    #[tokio::test]
    async fn test_e_wallet_needs_reference() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(
            &r.checkout,
            PaymentInput {
                payment_method: PaymentMethod::GCash,
                reference_number: Some("   ".to_string()),
                cash_in_hand: Some("1000".to_string()),
            },
        )
        .unwrap();

        open_payment(&r.cart, &r.checkout).unwrap();
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert_eq!(
            response.messages,
            vec!["Reference number is required for GCash payments".to_string()]
        );

        set_payment(
            &r.checkout,
            PaymentInput {
                payment_method: PaymentMethod::GCash,
                reference_number: Some("GC-0098".to_string()),
                cash_in_hand: None,
            },
        )
        .unwrap();
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert!(response.receipt.is_some());
        assert_eq!(backend.submissions()[0].reference_number.as_deref(), Some("GC-0098"));
        assert!(backend.submissions()[0].cash_in_hand.is_none());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_cart_and_reopens_modal() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("1000")).unwrap();
        open_payment(&r.cart, &r.checkout).unwrap();

        backend.fail_next(ClientError::Api {
            status: 422,
            message: "Amoxicillin 500mg is out of stock".to_string(),
        });
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();

        assert!(response.receipt.is_none());
        assert_eq!(
            response.phase,
            CheckoutPhase::PaymentModalOpen {
                error: Some("Amoxicillin 500mg is out of stock".to_string())
            }
        );
        assert_eq!(get_cart(&r.cart).total_quantity, 4);

        // A retry reuses the client transaction id.
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert!(response.receipt.is_some());
        let submitted = backend.submissions();
        assert_eq!(submitted.len(), 2);
        assert_eq!(
            submitted[0].client_transaction_id,
            submitted[1].client_transaction_id
        );
    }

    #[tokio::test]
    async fn test_failure_without_server_message_uses_fallback() {
        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("1000")).unwrap();
        open_payment(&r.cart, &r.checkout).unwrap();

        backend.fail_next(ClientError::Unauthorized);
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert_eq!(response.messages, vec![GENERIC_FAILURE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_abandoned_submission_reopens_modal() {
        let mut backend = FakeBackend::new();
        backend.hang = true;
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("1000")).unwrap();
        open_payment(&r.cart, &r.checkout).unwrap();

        {
            let confirm = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config);
            tokio::pin!(confirm);
            tokio::select! {
                biased;
                _ = &mut confirm => panic!("submission answered"),
                _ = tokio::task::yield_now() => {}
            }
            assert_eq!(
                r.checkout.with_session(|s| s.flow.phase().clone()),
                CheckoutPhase::Processing
            );
        }

        assert_eq!(
            r.checkout.with_session(|s| s.flow.phase().clone()),
            CheckoutPhase::PaymentModalOpen {
                error: Some(GENERIC_FAILURE_MESSAGE.to_string())
            }
        );
        set_payment(&r.checkout, cash("2000")).unwrap();
        assert_eq!(get_cart(&r.cart).total_quantity, 4);

        backend.hang = false;
        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert!(response.receipt.is_some());
        let submitted = backend.submissions();
        assert_eq!(submitted.len(), 2);
        assert_eq!(
            submitted[0].client_transaction_id,
            submitted[1].client_transaction_id
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_items_added_right_after_confirmation_are_kept() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let backend = FakeBackend::new();
        let r = worked_example(&backend).await;
        set_payment(&r.checkout, cash("1000")).unwrap();
        open_payment(&r.cart, &r.checkout).unwrap();

        let catalog = Arc::new(CatalogState::new());
        catalog.replace(r.catalog.with_snapshot(|s| s.clone()));
        let stop = Arc::new(AtomicBool::new(false));
        let adder = {
            let (cart, checkout, catalog, stop) =
                (r.cart.clone(), r.checkout.clone(), catalog.clone(), stop.clone());
            std::thread::spawn(move || {
                let mut added = 0;
                while !stop.load(Ordering::SeqCst) {
                    if add_to_cart(&catalog, &cart, &checkout, "amox", Some(1)).is_ok() {
                        added += 1;
                    }
                }
                added
            })
        };

        let response = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap();
        assert!(response.receipt.is_some());

        stop.store(true, Ordering::SeqCst);
        let added = adder.join().unwrap();
        assert_eq!(get_cart(&r.cart).total_quantity, added);
    }

    #[tokio::test]
    async fn test_modal_transitions() {
        let backend = FakeBackend::new();
        let r = Register::loaded(&backend).await;

        let err = open_payment(&r.cart, &r.checkout).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);

        let err = confirm_payment(&backend, &r.cart, &r.checkout, &r.catalog, &r.config)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);

        add_to_cart(&r.catalog, &r.cart, &r.checkout, "mask", Some(1)).unwrap();
        open_payment(&r.cart, &r.checkout).unwrap();
        assert_eq!(cancel_payment(&r.checkout).unwrap(), CheckoutPhase::Idle);
        assert!(cancel_payment(&r.checkout).is_err());
    }

    #[tokio::test]
    async fn test_stock_issue_blocks_opening() {
        let backend = FakeBackend::new();
        let r = Register::loaded(&backend).await;
        add_to_cart(&r.catalog, &r.cart, &r.checkout, "mask", Some(3)).unwrap();

        let err = open_payment(&r.cart, &r.checkout).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);
    }

    #[tokio::test]
    async fn test_input_validation() {
        let backend = FakeBackend::new();
        let r = Register::loaded(&backend).await;

        assert_eq!(
            select_discount(&r.catalog, &r.checkout, "99").unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            set_special_discount(&r.checkout, "-5").unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            set_payment(&r.checkout, cash("abc")).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert!(set_special_discount(&r.checkout, "").unwrap().special_discount.is_zero());
    }

    #[tokio::test]
    async fn test_server_settings_override_local_vat() {
        let mut backend = FakeBackend::new();
        backend.settings.vat_enabled = false;
        let r = Register::loaded(&backend).await;
        add_to_cart(&r.catalog, &r.cart, &r.checkout, "amox", Some(4)).unwrap();

        let gate = get_checkout_gate(&r.cart, &r.checkout, &r.catalog, &r.config);
        assert!(gate.summary.vat.is_zero());
        assert_eq!(gate.summary.total, Money::from_pesos(1000));
    }
}
