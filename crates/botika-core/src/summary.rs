//! # Transaction Summary
//!
//! Derives the totals shown in the payment modal.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal            Σ unit_price × qty            (every line)         │
//! │  regular discount    discountable subtotal × %     (if one selected)    │
//! │  special discount    flat amount                   (stacks)             │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │  after discounts     subtotal − regular − special                       │
//! │  VAT                 after discounts × rate        (if VAT enabled)     │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │  total               max(0, after discounts + VAT)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use botika_core::money::Money;
//! use botika_core::summary::TransactionSummary;
//! use botika_core::types::{Percent, VatRate};
//!
//! let summary = TransactionSummary::from_amounts(
//!     Money::from_pesos(1000),
//!     Money::from_pesos(1000),
//!     Some(Percent::from_whole(20)),
//!     Money::from_pesos(50),
//!     Some(VatRate::from_bps(1200)),
//! );
//! assert_eq!(summary.regular_discount, Money::from_pesos(200));
//! assert_eq!(summary.after_discounts(), Money::from_pesos(750));
//! assert_eq!(summary.vat, Money::from_pesos(90));
//! assert_eq!(summary.total, Money::from_pesos(840));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::discount::DiscountSelection;
use crate::money::Money;
use crate::types::{CheckoutSettings, Percent, VatRate};

/// Totals derived from the cart, the discount inputs and store settings.
///
/// Never mutated directly: recompute it whenever an input changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub subtotal: Money,
    pub regular_discount: Money,
    pub special_discount: Money,
    pub vat: Money,
    pub total: Money,
}

impl TransactionSummary {
    /// Computes the summary for a cart.
    pub fn compute(
        cart: &Cart,
        discount: &DiscountSelection,
        settings: &CheckoutSettings,
    ) -> Self {
        let percent = discount.has_regular().then_some(discount.discount_percent);
        let vat_rate = settings.vat_enabled.then_some(settings.vat_rate);

        Self::from_amounts(
            cart.subtotal(),
            cart.discountable_subtotal(),
            percent,
            discount.special_discount,
            vat_rate,
        )
    }

    /// Computes the summary from raw amounts.
    ///
    /// `percent` is `None` when no regular discount is selected and
    /// `vat_rate` is `None` when VAT is disabled. A negative VAT base
    /// (discounts larger than the subtotal) yields zero VAT.
    pub fn from_amounts(
        subtotal: Money,
        discountable_subtotal: Money,
        percent: Option<Percent>,
        special_discount: Money,
        vat_rate: Option<VatRate>,
    ) -> Self {
        let regular_discount = percent
            .map(|p| discountable_subtotal.percent_of(p))
            .unwrap_or_default();

        let after_discounts = subtotal - regular_discount - special_discount;

        let vat = vat_rate
            .map(|rate| after_discounts.floor_zero().calculate_vat(rate))
            .unwrap_or_default();

        TransactionSummary {
            subtotal,
            regular_discount,
            special_discount,
            vat,
            total: (after_discounts + vat).floor_zero(),
        }
    }

    /// Subtotal minus both discounts (may be negative).
    pub fn after_discounts(&self) -> Money {
        self.subtotal - self.regular_discount - self.special_discount
    }

    /// Both discounts together.
    pub fn total_discount(&self) -> Money {
        self.regular_discount + self.special_discount
    }
}
