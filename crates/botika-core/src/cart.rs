//! # Cart
//!
//! The in-memory shopping cart the checkout totals are derived from.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Method                   Cart Change          │
//! │  ──────────────           ──────                   ───────────          │
//! │  Pick item ─────────────► add_item() ────────────► push / qty += n      │
//! │  Change quantity ───────► update_quantity() ─────► qty = n (0 removes)  │
//! │  Remove line ───────────► remove_item() ─────────► line dropped         │
//! │  Clear / paid ──────────► clear() ───────────────► empty                │
//! │  Catalog reloaded ──────► refresh_stock() ───────► max_stock updated    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Limits Are Soft
//! A line may hold more than its `max_stock`. The cart reports it through
//! [`Cart::has_stock_issues`] and the checkout gate refuses to confirm,
//! but the mutation itself succeeds so the cashier can see and fix it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CatalogItem;
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// The price is frozen when the item is added. A later catalog reload
/// updates `max_stock` but never the price of a line already rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// Known stock ceiling. `None` means unlimited (services).
    pub max_stock: Option<i64>,
    pub is_discountable: bool,
}

impl CartItem {
    /// Creates a cart line from a catalog entry.
    pub fn from_catalog(item: &CatalogItem, quantity: i64) -> Self {
        CartItem {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            max_stock: item.max_stock(),
            is_discountable: item.is_discountable,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// True when the line asks for more than is on hand.
    pub fn exceeds_stock(&self) -> bool {
        self.max_stock.is_some_and(|max| self.quantity > max)
    }
}

/// A line that asks for more than the catalog has on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockIssue {
    pub id: String,
    pub name: String,
    pub requested: i64,
    pub available: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `id` (adding the same item increases quantity)
/// - Every line has `quantity >= 1`
/// - At most 100 lines, at most 999 of any one item
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a catalog item or increases the quantity of its existing line.
    ///
    /// ```rust
    /// use botika_core::cart::Cart;
    /// use botika_core::money::Money;
    /// use botika_core::types::{CatalogItem, ItemType};
    ///
    /// let vitamin_c = CatalogItem {
    ///     id: "vit-c".into(),
    ///     name: "Ascorbic Acid 500mg".into(),
    ///     price: Money::from_pesos(8),
    ///     quantity: 50,
    ///     is_discountable: true,
    ///     item_type: ItemType::Product,
    /// };
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(&vitamin_c, 2).unwrap();
    /// cart.add_item(&vitamin_c, 3).unwrap();
    /// assert_eq!(cart.item_count(), 1);
    /// assert_eq!(cart.subtotal(), Money::from_pesos(40));
    /// ```
    pub fn add_item(&mut self, item: &CatalogItem, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price(item.price)?;

        if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            line.max_stock = item.max_stock();
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_catalog(item, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes the line.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(item_id);
        }

        validate_quantity(quantity)?;

        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == item_id)
            .ok_or_else(|| CoreError::ItemNotInCart(item_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by item id.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|line| line.id != item_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(item_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Re-reads stock ceilings from a fresh catalog snapshot.
    ///
    /// Lines whose item vanished from the catalog keep their last known
    /// ceiling. Returns how many lines changed.
    pub fn refresh_stock<'a, I>(&mut self, catalog: I) -> usize
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let mut changed = 0;
        for entry in catalog {
            if let Some(line) = self.items.iter_mut().find(|line| line.id == entry.id) {
                let max_stock = entry.max_stock();
                if line.max_stock != max_stock {
                    line.max_stock = max_stock;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of every line total. This is the subtotal shown to the cashier.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of the line totals a percentage discount may apply to.
    pub fn discountable_subtotal(&self) -> Money {
        self.items
            .iter()
            .filter(|line| line.is_discountable)
            .map(CartItem::line_total)
            .sum()
    }

    /// True when any line exceeds its stock ceiling.
    pub fn has_stock_issues(&self) -> bool {
        self.items.iter().any(CartItem::exceeds_stock)
    }

    /// Lines exceeding their stock ceiling.
    pub fn stock_issues(&self) -> Vec<StockIssue> {
        self.items
            .iter()
            .filter_map(|line| {
                let available = line.max_stock?;
                (line.quantity > available).then(|| StockIssue {
                    id: line.id.clone(),
                    name: line.name.clone(),
                    requested: line.quantity,
                    available,
                })
            })
            .collect()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}
