//! # Catalog Commands
//!
//! Loading the server's reference data.

use botika_api::PosBackend;
use botika_core::Discount;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartState, CatalogSnapshot, CatalogState};

/// Result of a catalog refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(flatten)]
    pub snapshot: CatalogSnapshot,

    /// Cart lines whose stock limit changed with this refresh.
    pub updated_cart_lines: usize,
}

/// Fetches the catalog, discounts and settings, and re-reads the stock
/// limits of lines already in the cart.
///
/// The three requests run concurrently; the cache is only replaced when
/// all of them succeed.
pub async fn refresh_catalog(
    backend: &dyn PosBackend,
    catalog: &CatalogState,
    cart: &CartState,
) -> Result<CatalogResponse, ApiError> {
    debug!("refresh_catalog command");

    let (items, discounts, settings) = tokio::try_join!(
        backend.fetch_catalog(),
        backend.fetch_discounts(),
        backend.fetch_settings(),
    )?;

    let updated_cart_lines = cart.with_cart_mut(|c| c.refresh_stock(items.iter()));

    let snapshot = CatalogSnapshot {
        items,
        discounts,
        settings: Some(settings),
    };
    catalog.replace(snapshot.clone());

    info!(
        items = snapshot.items.len(),
        discounts = snapshot.discounts.len(),
        vat_enabled = settings.vat_enabled,
        updated_cart_lines,
        "Catalog refreshed"
    );

    Ok(CatalogResponse {
        snapshot,
        updated_cart_lines,
    })
}

/// The discount policies offered in the discount dropdown.
pub fn list_discounts(catalog: &CatalogState) -> Vec<Discount> {
    debug!("list_discounts command");
    catalog.discounts()
}
