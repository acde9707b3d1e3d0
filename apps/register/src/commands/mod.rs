//! # Commands Module
//!
//! Everything the checkout UI can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Catalog / discount / settings refresh
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Discounts, payment inputs, payment modal
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs the catalog to look the item up
//! fn add_to_cart(catalog: &CatalogState, cart: &CartState, checkout: &CheckoutState, ..)
//!
//! // Talks to the server
//! async fn confirm_payment(backend: &dyn PosBackend, ..)
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
