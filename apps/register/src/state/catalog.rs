//! # Catalog State
//!
//! Last catalog, discount list and store settings fetched from the server.
//! Replaced wholesale by `refresh_catalog`; read by cart and checkout
//! commands.

use std::sync::{PoisonError, RwLock};

use botika_core::{CatalogItem, CheckoutSettings, Discount};
use serde::Serialize;

/// One consistent copy of the server's reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub items: Vec<CatalogItem>,
    pub discounts: Vec<Discount>,
    /// `None` until the first successful refresh.
    pub settings: Option<CheckoutSettings>,
}

/// Read-mostly cache of [`CatalogSnapshot`].
#[derive(Debug, Default)]
pub struct CatalogState {
    inner: RwLock<CatalogSnapshot>,
}

impl CatalogState {
    pub fn new() -> Self {
        CatalogState::default()
    }

    /// Swaps in a freshly fetched snapshot.
    pub fn replace(&self, snapshot: CatalogSnapshot) {
        let mut current = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
    }

    /// Executes a function with read access to the snapshot.
    pub fn with_snapshot<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CatalogSnapshot) -> R,
    {
        let snapshot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&snapshot)
    }

    /// Looks up a catalog item by id.
    pub fn find_item(&self, item_id: &str) -> Option<CatalogItem> {
        self.with_snapshot(|s| s.items.iter().find(|i| i.id == item_id).cloned())
    }

    /// Looks up a discount policy by id.
    pub fn find_discount(&self, discount_id: &str) -> Option<Discount> {
        self.with_snapshot(|s| s.discounts.iter().find(|d| d.id == discount_id).cloned())
    }

    pub fn discounts(&self) -> Vec<Discount> {
        self.with_snapshot(|s| s.discounts.clone())
    }

    /// Server settings, or `fallback` before the first refresh.
    pub fn settings_or(&self, fallback: CheckoutSettings) -> CheckoutSettings {
        self.with_snapshot(|s| s.settings.unwrap_or(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botika_core::{ItemType, Money, Percent, VatRate};

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            items: vec![CatalogItem {
                id: "17".to_string(),
                name: "Biogesic 500mg".to_string(),
                price: Money::from_centavos(450),
                quantity: 120,
                is_discountable: true,
                item_type: ItemType::Product,
            }],
            discounts: vec![Discount {
                id: "1".to_string(),
                discount_name: "PWD".to_string(),
                percent: Percent::from_whole(20),
            }],
            settings: Some(CheckoutSettings {
                vat_enabled: false,
                vat_rate: VatRate::STANDARD,
            }),
        }
    }

    #[test]
    fn test_lookups() {
        let state = CatalogState::new();
        assert!(state.find_item("17").is_none());

        state.replace(snapshot());
        assert_eq!(state.find_item("17").map(|i| i.quantity), Some(120));
        assert!(state.find_discount("1").is_some());
        assert!(state.find_discount("2").is_none());
        assert_eq!(state.discounts().len(), 1);
    }

    #[test]
    fn test_settings_fall_back_until_refreshed() {
        let state = CatalogState::new();
        let local = CheckoutSettings::default();
        assert!(state.settings_or(local).vat_enabled);

        state.replace(snapshot());
        assert!(!state.settings_or(local).vat_enabled);
    }
}
