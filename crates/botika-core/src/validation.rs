//! # Validation Module
//!
//! Input validation for values the cashier types into the checkout UI.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Checkout UI                                                   │
//! │  ├── Basic format checks (empty, numeric)                               │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands                                             │
//! │  └── THIS MODULE: quantities, amounts, reference numbers, senior IDs    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout gate                                                 │
//! │  └── Cross-field rules (cash ≥ total, reference for e-wallets)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest reference number an e-wallet receipt carries.
pub const MAX_REFERENCE_LENGTH: usize = 64;

/// Longest senior citizen ID accepted.
pub const MAX_SENIOR_ID_LENGTH: usize = 32;

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a decimal string into hundredths ("12.5" → 1250).
///
/// Used for peso amounts (centavos) and percentages (basis points), which
/// share the same two-decimal scale. Fractional digits past the second must
/// be zeros; anything else would need rounding and is rejected.
pub(crate) fn parse_hundredths(input: &str, field: &str) -> ValidationResult<i64> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a decimal number"));
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a decimal number"));
    }
    if fraction.len() > 2 && fraction[2..].chars().any(|c| c != '0') {
        return Err(invalid("at most two decimal places"));
    }

    let mut hundredths: i64 = 0;
    for digit in fraction.chars().chain("00".chars()).take(2) {
        hundredths = hundredths * 10 + i64::from(digit as u8 - b'0');
    }

    let whole: i64 = whole.parse().map_err(|_| invalid("value is too large"))?;
    let value = whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(hundredths))
        .ok_or_else(|| invalid("value is too large"))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// Stock ceilings are NOT checked here: exceeding stock is a soft
/// violation reported by the cart, not a rejected input.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Rejects negative amounts and amounts above `MAX_AMOUNT`.
fn validate_amount(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT.pesos(),
        });
    }

    Ok(())
}

/// Validates a catalog price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    validate_amount(price, "price")
}

/// Validates the flat special discount the cashier enters.
///
/// ```rust
/// use botika_core::money::Money;
/// use botika_core::validation::validate_special_discount;
///
/// assert!(validate_special_discount(Money::from_pesos(50)).is_ok());
/// assert!(validate_special_discount(Money::zero()).is_ok());
/// assert!(validate_special_discount(Money::from_pesos(-1)).is_err());
/// ```
pub fn validate_special_discount(amount: Money) -> ValidationResult<()> {
    validate_amount(amount, "special discount")
}

/// Validates the cash the customer handed over.
pub fn validate_cash_in_hand(amount: Money) -> ValidationResult<()> {
    validate_amount(amount, "cash in hand")
}

/// Validates a discount percentage in basis points (0% to 100%).
pub fn validate_percent_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a VAT rate in basis points (0% to 100%).
pub fn validate_vat_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "vat rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an e-wallet reference number and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and spaces only
///
/// ```rust
/// use botika_core::validation::validate_reference_number;
///
/// assert_eq!(validate_reference_number(" 1009 233 4 ").unwrap(), "1009 233 4");
/// assert!(validate_reference_number("   ").is_err());
/// assert!(validate_reference_number("REF#1").is_err());
/// ```
pub fn validate_reference_number(reference: &str) -> ValidationResult<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(ValidationError::Required {
            field: "reference number".to_string(),
        });
    }

    if reference.chars().count() > MAX_REFERENCE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "reference number".to_string(),
            max: MAX_REFERENCE_LENGTH,
        });
    }

    if !reference
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "reference number".to_string(),
            reason: "must contain only letters, numbers, hyphens, and spaces".to_string(),
        });
    }

    Ok(reference.to_string())
}

/// Validates a senior citizen ID and returns it trimmed.
pub fn validate_senior_id(senior_id: &str) -> ValidationResult<String> {
    let senior_id = senior_id.trim();

    if senior_id.is_empty() {
        return Err(ValidationError::Required {
            field: "senior citizen ID".to_string(),
        });
    }

    if senior_id.chars().count() > MAX_SENIOR_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "senior citizen ID".to_string(),
            max: MAX_SENIOR_ID_LENGTH,
        });
    }

    Ok(senior_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hundredths() {
        assert_eq!(parse_hundredths("12", "x").unwrap(), 1200);
        assert_eq!(parse_hundredths("12.5", "x").unwrap(), 1250);
        assert_eq!(parse_hundredths("12.05", "x").unwrap(), 1205);
        assert_eq!(parse_hundredths("12.500", "x").unwrap(), 1250);
        assert_eq!(parse_hundredths("+3.1", "x").unwrap(), 310);
        assert_eq!(parse_hundredths("-0.75", "x").unwrap(), -75);
        assert_eq!(parse_hundredths("7.", "x").unwrap(), 700);
    }

    #[test]
    fn test_parse_hundredths_rejects_garbage() {
        assert!(matches!(
            parse_hundredths("", "price"),
            Err(ValidationError::Required { .. })
        ));
        assert!(parse_hundredths(".5", "x").is_err());
        assert!(parse_hundredths("1e3", "x").is_err());
        assert!(parse_hundredths("1.2.3", "x").is_err());
        assert!(parse_hundredths("0.30000000000000004", "x").is_err());
        assert!(parse_hundredths("99999999999999999999", "x").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_percent_and_vat() {
        assert!(validate_percent_bps(0).is_ok());
        assert!(validate_percent_bps(2000).is_ok());
        assert!(validate_percent_bps(10001).is_err());

        assert!(validate_vat_rate_bps(1200).is_ok());
        assert!(validate_vat_rate_bps(12000).is_err());
    }

    #[test]
    fn test_validate_reference_number() {
        assert_eq!(validate_reference_number("ABC-123").unwrap(), "ABC-123");
        assert!(validate_reference_number("").is_err());
        assert!(validate_reference_number(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_senior_id() {
        assert_eq!(validate_senior_id("  SC-00123 ").unwrap(), "SC-00123");
        assert!(validate_senior_id(" ").is_err());
        assert!(validate_senior_id(&"1".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_amount_ceiling() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(MAX_AMOUNT).is_ok());
        assert!(matches!(
            validate_price(MAX_AMOUNT + Money::from_centavos(1)),
            Err(ValidationError::OutOfRange { max: 10_000_000, .. })
        ));
        assert!(validate_price(Money::from_pesos(900_000_000_000_000)).is_err());
        assert!(validate_special_discount(Money::from_pesos(20_000_000)).is_err());
        assert!(validate_cash_in_hand(Money::from_pesos(20_000_000)).is_err());
    }
}
