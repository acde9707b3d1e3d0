//! # State Module
//!
//! Session state for one register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌────────────────┐ ┌──────────────┐ ┌─────────────┐  │
//! │  │  CartState   │ │ CheckoutState  │ │ CatalogState │ │ ConfigState │  │
//! │  │              │ │                │ │              │ │             │  │
//! │  │  Arc<Mutex<  │ │  Arc<Mutex<    │ │  RwLock<     │ │ store name  │  │
//! │  │    Cart      │ │   Checkout     │ │   catalog,   │ │ currency    │  │
//! │  │  >>          │ │   Session>>    │ │   discounts, │ │ VAT default │  │
//! │  │              │ │                │ │   settings>  │ │             │  │
//! │  └──────────────┘ └────────────────┘ └──────────────┘ └─────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState, CheckoutState: exclusive access through closures         │
//! │  • CatalogState: many readers, replaced wholesale on refresh           │
//! │  • ConfigState: read-only after initialization                         │
//! │  • No guard is ever held across an .await                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod checkout;
mod config;

pub use cart::CartState;
pub use catalog::{CatalogSnapshot, CatalogState};
pub use checkout::{CheckoutSession, CheckoutState};
pub use config::ConfigState;
