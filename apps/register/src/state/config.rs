//! # Configuration State
//!
//! Register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BOTIKA_*`)
//! 2. Defaults (this file)
//!
//! VAT settings here are only the local default: once `refresh_catalog`
//! has fetched the store settings from the server, those win.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use botika_core::{CheckoutSettings, Money, VatRate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown on the receipt)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Local default for the "Show VAT" setting
    pub vat_enabled: bool,

    /// Local default VAT rate
    pub vat_rate: VatRate,
}

impl Default for ConfigState {
    /// Development defaults: PHP (₱), 12% VAT shown.
    fn default() -> Self {
        ConfigState {
            store_name: "Botika Pharmacy".to_string(),
            currency_code: "PHP".to_string(),
            currency_symbol: "₱".to_string(),
            currency_decimals: 2,
            vat_enabled: true,
            vat_rate: VatRate::STANDARD,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BOTIKA_STORE_NAME`: Override store name
    /// - `BOTIKA_VAT_RATE`: Override VAT rate (e.g., "12")
    /// - `BOTIKA_SHOW_VAT`: "true" / "false"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("BOTIKA_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(rate) = lookup("BOTIKA_VAT_RATE") {
            match VatRate::parse(&rate) {
                Ok(parsed) => config.vat_rate = parsed,
                Err(e) => warn!(value = %rate, error = %e, "Ignoring invalid BOTIKA_VAT_RATE"),
            }
        }

        if let Some(show) = lookup("BOTIKA_SHOW_VAT") {
            match show.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => config.vat_enabled = true,
                "false" | "0" | "no" => config.vat_enabled = false,
                _ => warn!(value = %show, "Ignoring invalid BOTIKA_SHOW_VAT"),
            }
        }

        config
    }

    /// Checkout settings to use before the server's are known.
    pub fn default_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            vat_enabled: self.vat_enabled,
            vat_rate: self.vat_rate,
        }
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use botika_core::Money;
    /// use botika_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_centavos(123456)), "₱1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.centavos();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    group_thousands(whole),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                group_thousands(whole)
            }
        )
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
