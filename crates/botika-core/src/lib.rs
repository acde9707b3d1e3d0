//! # botika-core: Pure Checkout Logic for Botika POS
//!
//! The cart/transaction calculator behind the POS checkout: cart lines,
//! subtotal, regular and special discounts, VAT, total, payment validation
//! and change. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Botika POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Checkout UI (web front-end)                  │   │
//! │  │    Item search ──► Cart ──► Payment modal ──► Receipt           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/register (session + commands)              │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼──────────────────┐  ┌─────────▼──────────────────┐   │
//! │  │  ★ botika-core (THIS CRATE) ★   │  │  botika-api (REST client)  │   │
//! │  │  cart • discount • summary      │  │  catalog • discounts       │   │
//! │  │  payment • checkout • money     │  │  settings • transactions   │   │
//! │  │  NO I/O • PURE FUNCTIONS        │  └────────────────────────────┘   │
//! │  └─────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Peso amounts in integer centavos
//! - [`types`] - Catalog items, discounts, payment methods, settings
//! - [`cart`] - Cart lines and stock-limit checks
//! - [`discount`] - Regular / special discount inputs and the senior ID rule
//! - [`summary`] - Subtotal, discounts, VAT, total
//! - [`payment`] - Cash and e-wallet payment rules, change due
//! - [`checkout`] - Confirmation gate and the payment-modal state machine
//! - [`validation`] - Input validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use botika_core::cart::Cart;
//! use botika_core::checkout::CheckoutGate;
//! use botika_core::discount::DiscountSelection;
//! use botika_core::money::Money;
//! use botika_core::payment::PaymentRequest;
//! use botika_core::types::{CatalogItem, CheckoutSettings, ItemType};
//!
//! let amoxicillin = CatalogItem {
//!     id: "amox-500".into(),
//!     name: "Amoxicillin 500mg".into(),
//!     price: Money::from_pesos(250),
//!     quantity: 40,
//!     is_discountable: true,
//!     item_type: ItemType::Product,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&amoxicillin, 4).unwrap();
//!
//! let gate = CheckoutGate::evaluate(
//!     &cart,
//!     &DiscountSelection::none(),
//!     &PaymentRequest::cash(Money::from_pesos(1200)),
//!     &CheckoutSettings::default(),
//! );
//!
//! // ₱1000 + 12% VAT
//! assert_eq!(gate.summary.total, Money::from_pesos(1120));
//! assert_eq!(gate.change_amount, Money::from_pesos(80));
//! assert!(gate.can_confirm);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod payment;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, StockIssue};
pub use checkout::{BlockingReason, CheckoutFlow, CheckoutGate, CheckoutPhase};
pub use discount::DiscountSelection;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::PaymentRequest;
pub use summary::TransactionSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in the cart.
///
/// Catches typos at the counter (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest peso amount accepted for a price, the special discount, or
/// cash in hand (₱10,000,000).
///
/// With `MAX_ITEM_QUANTITY` and `MAX_CART_ITEMS` this keeps every cart
/// total far inside i64 centavos.
pub const MAX_AMOUNT: Money = Money::from_pesos(10_000_000);

/// Philippine VAT, 12%, in basis points.
pub const DEFAULT_VAT_RATE_BPS: u32 = 1200;

/// Discount names containing this word (case-insensitive) are senior
/// citizen discounts and need a senior citizen ID.
pub const SENIOR_DISCOUNT_KEYWORD: &str = "senior";
