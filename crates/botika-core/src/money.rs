//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1000 × 0.12 = 120.00000000000001  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    100000 centavos × 1200 bps / 10000 = 12000 centavos                  │
//! │    Rounding happens in exactly one place and is explicit               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use botika_core::money::Money;
//!
//! let price = Money::from_centavos(1099); // ₱10.99
//! let doubled = price * 2;                // ₱21.98
//! let total = price + Money::from_pesos(5); // ₱15.99
//! assert_eq!(total.centavos(), 1599);
//! assert_eq!(doubled.to_string(), "₱21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Percent, VatRate};
use crate::validation::{parse_hundredths, ValidationResult};

// =============================================================================
// Money Type
// =============================================================================

/// A peso amount in centavos (1/100 peso).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate values such as "subtotal minus
///   discounts" may go negative before the total is floored at zero
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// CatalogItem.price ──► CartItem.unit_price ──► CartItem.line_total
///                                                    │
///            Cart.subtotal ◄─────────────────────────┘
///                 │
///                 ▼
///   − regular discount − special discount + VAT = total ──► change due
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    ///
    /// let price = Money::from_centavos(1099);
    /// assert_eq!(price.centavos(), 1099);
    /// ```
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Parses a decimal peso string exactly ("12", "12.5", "12.50").
    ///
    /// More than two fractional digits is rejected rather than rounded.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    ///
    /// assert_eq!(Money::parse("12.5").unwrap().centavos(), 1250);
    /// assert_eq!(Money::parse("-3").unwrap().centavos(), -300);
    /// assert!(Money::parse("1.005").is_err());
    /// ```
    pub fn parse(input: &str) -> ValidationResult<Self> {
        parse_hundredths(input, "amount").map(Money)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the value at zero.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    ///
    /// assert_eq!(Money::from_centavos(-250).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_centavos(250).floor_zero().centavos(), 250);
    /// ```
    #[inline]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    ///
    /// let unit_price = Money::from_centavos(299);
    /// assert_eq!(unit_price.multiply_quantity(3).centavos(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `bps / 10000` of this amount, rounded half up.
    ///
    /// Shared by discount and VAT math so both round the same way:
    /// `(amount × bps + 5000) / 10000`, computed in i128.
    fn portion_bps(&self, bps: u32) -> Money {
        let centavos = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(centavos as i64)
    }

    /// Calculates a percentage of this amount (the discount amount).
    ///
    /// ```rust
    /// use botika_core::money::Money;
    /// use botika_core::types::Percent;
    ///
    /// let subtotal = Money::from_pesos(1000);
    /// let discount = subtotal.percent_of(Percent::from_whole(20));
    /// assert_eq!(discount, Money::from_pesos(200));
    /// ```
    pub fn percent_of(&self, percent: Percent) -> Money {
        self.portion_bps(percent.bps())
    }

    /// Calculates VAT on this amount.
    ///
    /// ```rust
    /// use botika_core::money::Money;
    /// use botika_core::types::VatRate;
    ///
    /// let base = Money::from_pesos(750);
    /// assert_eq!(base.calculate_vat(VatRate::from_bps(1200)), Money::from_pesos(90));
    ///
    /// // ₱10.05 × 12% = ₱1.206 → ₱1.21
    /// let odd = Money::from_centavos(1005);
    /// assert_eq!(odd.calculate_vat(VatRate::from_bps(1200)).centavos(), 121);
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        self.portion_bps(rate.bps())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `₱1234.50`. The UI does its own localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.pesos().abs(), self.centavos_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.pesos(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_centavos(1099).to_string(), "₱10.99");
        assert_eq!(Money::from_pesos(840).to_string(), "₱840.00");
        assert_eq!(Money::from_centavos(-550).to_string(), "-₱5.50");
        assert_eq!(Money::zero().to_string(), "₱0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(10);
        let b = Money::from_pesos(5);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        assert_eq!((a * 3).centavos(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_pesos(20));
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // ₱0.25 × 10% = 2.5 centavos → 3
        let amount = Money::from_centavos(25);
        assert_eq!(amount.percent_of(Percent::from_whole(10)).centavos(), 3);

        // ₱0.24 × 10% = 2.4 centavos → 2
        let amount = Money::from_centavos(24);
        assert_eq!(amount.percent_of(Percent::from_whole(10)).centavos(), 2);
    }

    #[test]
    fn test_vat_zero_rate() {
        let amount = Money::from_pesos(1234);
        assert!(amount.calculate_vat(VatRate::zero()).is_zero());
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_centavos(-1).floor_zero(), Money::zero());
        assert_eq!(Money::from_centavos(1).floor_zero(), Money::from_centavos(1));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("840").unwrap(), Money::from_pesos(840));
        assert_eq!(Money::parse("0.5").unwrap().centavos(), 50);
        assert_eq!(Money::parse(" 12.34 ").unwrap().centavos(), 1234);
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.234").is_err());
    }

    #[test]
    fn test_serializes_as_centavos() {
        let json = serde_json::to_string(&Money::from_centavos(1099)).unwrap();
        assert_eq!(json, "1099");
    }
}
