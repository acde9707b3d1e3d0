//! # Botika Register Library
//!
//! Session layer of the Botika POS checkout: the state a register holds
//! between UI actions and the commands the UI invokes against it.
//!
//! ## Module Organization
//! ```text
//! botika_register/
//! ├── lib.rs          ◄─── You are here (Register wiring & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state
//! │   ├── checkout.rs ◄─── Payment modal + discount/payment inputs
//! │   ├── catalog.rs  ◄─── Cached catalog, discounts, settings
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Catalog refresh
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── checkout.rs ◄─── Discounts, payment, confirmation
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── Error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or info,botika=debug,reqwest=warn│
//! │  2. Register::from_env()      ConfigState + ApiConfig + HttpPosBackend  │
//! │  3. refresh_catalog()         items, discounts, store settings          │
//! │  4. serve UI commands         cart ──► payment modal ──► receipt        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use botika_api::{ApiConfig, HttpPosBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{CartState, CatalogState, CheckoutState, ConfigState};

/// Everything one register needs, built once at startup.
#[derive(Debug)]
pub struct Register {
    pub backend: HttpPosBackend,
    pub cart: CartState,
    pub checkout: CheckoutState,
    pub catalog: CatalogState,
    pub config: ConfigState,
}

impl Register {
    /// Builds the register from the environment and `api.toml`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::load()?, ConfigState::from_env())
    }

    /// Builds the register from already-loaded configuration.
    pub fn new(api: ApiConfig, config: ConfigState) -> Result<Self, ApiError> {
        let backend = HttpPosBackend::new(api)?;

        info!(
            store = %config.store_name,
            api = %backend.config().base_url,
            "Register initialized"
        );

        Ok(Register {
            backend,
            cart: CartState::new(),
            checkout: CheckoutState::new(),
            catalog: CatalogState::new(),
            config,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=botika=trace` - Show trace for botika crates only
/// - Default: INFO, with debug for botika crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,botika=debug,reqwest=warn"));

    // try_init: a second call (tests, embedding apps) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_register_starts_empty() {
        let register = Register::new(ApiConfig::default(), ConfigState::default()).unwrap();
        assert!(register.cart.with_cart(|c| c.is_empty()));
        assert!(register.catalog.discounts().is_empty());
        assert!(!register.checkout.with_session(|s| s.flow.is_modal_open()));
    }

    #[test]
    fn test_register_rejects_invalid_api_config() {
        let api = ApiConfig {
            base_url: "ftp://example".to_string(),
            ..ApiConfig::default()
        };
        assert!(Register::new(api, ConfigState::default()).is_err());
    }
}
