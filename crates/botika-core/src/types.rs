//! # Domain Types
//!
//! Types the checkout consumes from the catalog/transaction API and the
//! small value types the calculator is built from.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │  CatalogItem    │   │    Discount     │   │ TransactionReceipt   │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id, name       │   │  id             │   │  receipt_number      │  │
//! │  │  price          │   │  discount_name  │   │  total_amount        │  │
//! │  │  quantity       │   │  percent        │   │  payment_method      │  │
//! │  │  is_discountable│   └─────────────────┘   │  change_amount       │  │
//! │  │  item_type      │                         └──────────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Percent      │   │    VatRate      │   │   PaymentMethod      │  │
//! │  │  bps (u32)      │   │  bps (u32)      │   │  Cash | GCash        │  │
//! │  │  2000 = 20%     │   │  1200 = 12%     │   │  Maya | GoTyme       │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{parse_hundredths, validate_percent_bps, validate_vat_rate_bps};

// =============================================================================
// Percent
// =============================================================================

/// A discount percentage in basis points (1 bp = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number (20 → 20%).
    #[inline]
    pub const fn from_whole(percent: u32) -> Self {
        Percent(percent * 100)
    }

    /// Parses a decimal percentage ("20", "5.5").
    ///
    /// ```rust
    /// use botika_core::types::Percent;
    ///
    /// assert_eq!(Percent::parse("5.5").unwrap().bps(), 550);
    /// assert!(Percent::parse("120").is_err());
    /// assert!(Percent::parse("-5").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let bps = parse_bps(input, "discount percent")?;
        validate_percent_bps(bps)?;
        Ok(Percent(bps))
    }

    /// Returns the percentage in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bps(self.0, f)
    }
}

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate in basis points. Philippine VAT is 12% (1200 bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(u32);

impl VatRate {
    /// Standard Philippine VAT rate.
    pub const STANDARD: VatRate = VatRate(crate::DEFAULT_VAT_RATE_BPS);

    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Parses a decimal percentage ("12", "12.00").
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let bps = parse_bps(input, "vat rate")?;
        validate_vat_rate_bps(bps)?;
        Ok(VatRate(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero VAT rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }

    /// Checks if VAT rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::STANDARD
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bps(self.0, f)
    }
}

fn parse_bps(input: &str, field: &str) -> Result<u32, ValidationError> {
    let hundredths = parse_hundredths(input, field)?;
    u32::try_from(hundredths).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: 100,
    })
}

fn fmt_bps(bps: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if bps % 100 == 0 {
        write!(f, "{}%", bps / 100)
    } else {
        write!(f, "{}.{:02}%", bps / 100, bps % 100)
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// What a catalog entry is. Services carry no stock ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Stocked goods (medicine, groceries).
    #[default]
    Product,
    /// Non-stocked items (consultation, blood pressure check).
    Service,
}

/// An entry from the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Units on hand.
    pub quantity: i64,
    pub is_discountable: bool,
    pub item_type: ItemType,
}

impl CatalogItem {
    /// The quantity ceiling a cart line is checked against.
    ///
    /// Services are never stock-limited.
    pub fn max_stock(&self) -> Option<i64> {
        match self.item_type {
            ItemType::Product => Some(self.quantity.max(0)),
            ItemType::Service => None,
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A named discount policy from the discount list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: String,
    pub discount_name: String,
    pub percent: Percent,
}

impl Discount {
    /// Whether this discount is the senior-citizen discount, which needs an ID.
    pub fn is_senior_citizen(&self) -> bool {
        is_senior_discount_name(&self.discount_name)
    }
}

/// Senior-citizen discounts are recognized by name.
pub(crate) fn is_senior_discount_name(name: &str) -> bool {
    name.to_lowercase().contains(crate::SENIOR_DISCOUNT_KEYWORD)
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash. Needs cash in hand, may produce change.
    #[default]
    Cash,
    #[serde(rename = "GCash")]
    GCash,
    Maya,
    GoTyme,
}

impl PaymentMethod {
    /// All methods, in the order the payment modal lists them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::GCash,
        PaymentMethod::Maya,
        PaymentMethod::GoTyme,
    ];

    /// Returns true for cash.
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Non-cash methods need the provider's reference number.
    pub fn requires_reference(&self) -> bool {
        !self.is_cash()
    }

    /// Label as the API and receipts spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::GCash => "GCash",
            PaymentMethod::Maya => "Maya",
            PaymentMethod::GoTyme => "GoTyme",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "gcash" => Ok(PaymentMethod::GCash),
            "maya" | "paymaya" => Ok(PaymentMethod::Maya),
            "gotyme" => Ok(PaymentMethod::GoTyme),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Settings & Results
// =============================================================================

/// Store settings that affect the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSettings {
    /// "Show VAT" store setting. When off, VAT is zero.
    pub vat_enabled: bool,
    pub vat_rate: VatRate,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            vat_enabled: true,
            vat_rate: VatRate::STANDARD,
        }
    }
}

/// What the API returns after a transaction is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub receipt_number: String,
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub change_amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(quantity: i64) -> CatalogItem {
        CatalogItem {
            id: "med-1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            price: Money::from_pesos(5),
            quantity,
            is_discountable: true,
            item_type: ItemType::Product,
        }
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from_whole(20).to_string(), "20%");
        assert_eq!(Percent::from_bps(550).to_string(), "5.50%");
        assert_eq!(VatRate::STANDARD.to_string(), "12%");
    }

    #[test]
    fn test_vat_rate_parse() {
        assert_eq!(VatRate::parse("12").unwrap(), VatRate::from_bps(1200));
        assert!(VatRate::parse("-1").is_err());
        assert!(VatRate::parse("101").is_err());
    }

    #[test]
    fn test_max_stock() {
        assert_eq!(medicine(30).max_stock(), Some(30));
        assert_eq!(medicine(-2).max_stock(), Some(0));

        let mut service = medicine(0);
        service.item_type = ItemType::Service;
        assert_eq!(service.max_stock(), None);
    }

    #[test]
    fn test_senior_discount_detection() {
        let senior = Discount {
            id: "1".to_string(),
            discount_name: "Senior Citizen".to_string(),
            percent: Percent::from_whole(20),
        };
        assert!(senior.is_senior_citizen());

        let promo = Discount {
            id: "2".to_string(),
            discount_name: "Loyalty Card".to_string(),
            percent: Percent::from_whole(5),
        };
        assert!(!promo.is_senior_citizen());
    }

    #[test]
    fn test_payment_method_parse_and_serde() {
        assert_eq!("gcash".parse::<PaymentMethod>().unwrap(), PaymentMethod::GCash);
        assert_eq!("GoTyme".parse::<PaymentMethod>().unwrap(), PaymentMethod::GoTyme);
        assert!("card".parse::<PaymentMethod>().is_err());

        let json = serde_json::to_string(&PaymentMethod::GCash).unwrap();
        assert_eq!(json, "\"GCash\"");
        let back: PaymentMethod = serde_json::from_str("\"Maya\"").unwrap();
        assert_eq!(back, PaymentMethod::Maya);
    }

    #[test]
    fn test_requires_reference() {
        assert!(!PaymentMethod::Cash.requires_reference());
        for method in [PaymentMethod::GCash, PaymentMethod::Maya, PaymentMethod::GoTyme] {
            assert!(method.requires_reference());
        }
    }

    #[test]
    fn test_settings_default() {
        let settings = CheckoutSettings::default();
        assert!(settings.vat_enabled);
        assert_eq!(settings.vat_rate.bps(), 1200);
    }
}
