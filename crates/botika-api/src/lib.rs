//! # botika-api: REST Client for Botika POS
//!
//! Fetches the catalog, discounts and store settings, and records paid
//! transactions. Wire JSON is converted to [`botika_core`] types here.
//!
//! ```text
//!   register ──► PosBackend ──► HttpPosBackend ──► GET  /items
//!                                                  GET  /discounts
//!                                                  GET  /settings
//!                                                  POST /transactions
//! ```

pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod http;

pub use backend::PosBackend;
pub use config::ApiConfig;
pub use dto::TransactionRequest;
pub use error::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};
pub use http::HttpPosBackend;
