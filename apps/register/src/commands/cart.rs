//! # Cart Commands
//!
//! Cart manipulation from the item search and cart panel.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │  Modal   │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart      confirm_payment                     │
//! │                   update_item      (checkout.rs)                       │
//! │                   remove_item                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is refused while the payment modal is open.

use botika_core::{Cart, CartItem, Money, StockIssue};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::checkout::ensure_cart_editable;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, CheckoutState};

/// Cart contents for the cart panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub stock_issues: Vec<StockIssue>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            stock_issues: cart.stock_issues(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a catalog item to the cart.
///
/// ## Behavior
/// - Item already in cart: quantity increases
/// - Item not in cart: added as a new line at the catalog price
/// - Going over stock is allowed here; it is flagged and blocks payment
///
/// ## Arguments
/// * `item_id` - Catalog item id
/// * `quantity` - Quantity to add (default: 1)
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    checkout: &CheckoutState,
    item_id: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(item_id = %item_id, quantity = %quantity, "add_to_cart command");

    ensure_cart_editable(checkout)?;

    let item = catalog
        .find_item(item_id)
        .ok_or_else(|| ApiError::not_found("Item", item_id))?;

    let response = cart.with_cart_mut(|c| {
        c.add_item(&item, quantity)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })?;

    info!(item_id = %item_id, quantity, lines = response.item_count, "Item added to cart");
    Ok(response)
}

/// Sets the quantity of a cart line. Quantity 0 removes the line.
pub fn update_cart_item(
    cart: &CartState,
    checkout: &CheckoutState,
    item_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, quantity = %quantity, "update_cart_item command");

    ensure_cart_editable(checkout)?;

    let response = cart.with_cart_mut(|c| {
        c.update_quantity(item_id, quantity)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })?;

    info!(item_id = %item_id, quantity, "Cart line updated");
    Ok(response)
}

/// Removes a line from the cart.
pub fn remove_from_cart(
    cart: &CartState,
    checkout: &CheckoutState,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, "remove_from_cart command");

    ensure_cart_editable(checkout)?;

    let response = cart.with_cart_mut(|c| {
        c.remove_item(item_id)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })?;

    info!(item_id = %item_id, "Cart line removed");
    Ok(response)
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartState, checkout: &CheckoutState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");

    ensure_cart_editable(checkout)?;

    let response = cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    });

    info!("Cart cleared");
    Ok(response)
}
