//! The seam between the register and the REST backend.

use async_trait::async_trait;
use botika_core::{CatalogItem, CheckoutSettings, Discount, TransactionReceipt};

use crate::dto::TransactionRequest;
use crate::error::ClientResult;

/// Everything the checkout needs from the server.
///
/// [`crate::HttpPosBackend`] talks to the real API; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait PosBackend: Send + Sync {
    /// `GET /items`
    async fn fetch_catalog(&self) -> ClientResult<Vec<CatalogItem>>;

    /// `GET /discounts`
    async fn fetch_discounts(&self) -> ClientResult<Vec<Discount>>;

    /// `GET /settings`
    async fn fetch_settings(&self) -> ClientResult<CheckoutSettings>;

    /// `POST /transactions`
    async fn submit_transaction(&self, request: &TransactionRequest) -> ClientResult<TransactionReceipt>;
}
