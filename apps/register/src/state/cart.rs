//! # Cart State
//!
//! The cart being rung up, shared between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Checkout UI Action       Command                 Cart Change           │
//! │  ──────────────────       ───────                 ───────────           │
//! │                                                                         │
//! │  Pick item ──────────────► add_to_cart() ───────► add or merge line     │
//! │  Change quantity ────────► update_cart_item() ──► set qty (0 removes)  │
//! │  Click Remove ───────────► remove_from_cart() ──► drop line            │
//! │  Click Clear ────────────► clear_cart() ────────► empty                 │
//! │  Catalog refresh ────────► refresh_catalog() ───► re-read stock limits │
//! │  Payment recorded ───────► confirm_payment() ───► empty                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use botika_core::Cart;

/// Thread-safe wrapper around the cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    inner: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new cart state with an empty cart.
    pub fn new() -> Self {
        CartState {
            inner: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botika_core::{CatalogItem, ItemType, Money};

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            price: Money::from_pesos(10),
            quantity: 50,
            is_discountable: true,
            item_type: ItemType::Product,
        }
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add_item(&item("1"), 2)).unwrap();

        assert_eq!(other.with_cart(|c| c.total_quantity()), 2);
        assert_eq!(other.snapshot().subtotal(), Money::from_pesos(20));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let state = CartState::new();
        state.with_cart_mut(|c| c.add_item(&item("1"), 1)).unwrap();

        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            poisoner.with_cart_mut(|_| panic!("boom"));
        })
        .join();

        assert_eq!(state.with_cart(|c| c.item_count()), 1);
    }
}
