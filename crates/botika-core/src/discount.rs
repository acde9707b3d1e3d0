//! # Discount Selection
//!
//! The discount inputs of the payment modal: at most one named
//! percentage discount, the senior citizen ID it may require, and a flat
//! special discount that stacks on top.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{is_senior_discount_name, Discount, Percent};
use crate::validation::{validate_senior_id, validate_special_discount};

/// Discount inputs for the current transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSelection {
    /// Selected policy. `None` means no regular discount.
    pub discount_id: Option<String>,
    pub discount_percent: Percent,
    pub discount_name: Option<String>,
    /// Required while a senior-citizen discount is selected.
    pub senior_id: String,
    /// Flat amount, independent of the percentage.
    pub special_discount: Money,
}

impl DiscountSelection {
    /// No regular discount, no special discount.
    pub fn none() -> Self {
        DiscountSelection::default()
    }

    /// Selects a discount policy, replacing any previous one.
    ///
    /// The senior ID survives switching between policies so the cashier
    /// does not retype it.
    pub fn select(&mut self, discount: &Discount) {
        self.discount_id = Some(discount.id.clone());
        self.discount_percent = discount.percent;
        self.discount_name = Some(discount.discount_name.clone());
    }

    /// Drops the regular discount and the senior ID with it.
    pub fn clear_regular(&mut self) {
        self.discount_id = None;
        self.discount_percent = Percent::zero();
        self.discount_name = None;
        self.senior_id.clear();
    }

    /// Sets the senior citizen ID. An empty string clears it.
    pub fn set_senior_id(&mut self, senior_id: &str) -> Result<(), ValidationError> {
        if senior_id.trim().is_empty() {
            self.senior_id.clear();
            return Ok(());
        }
        self.senior_id = validate_senior_id(senior_id)?;
        Ok(())
    }

    /// Sets the flat special discount.
    pub fn set_special_discount(&mut self, amount: Money) -> Result<(), ValidationError> {
        validate_special_discount(amount)?;
        self.special_discount = amount;
        Ok(())
    }

    /// True when a regular (percentage) discount is selected.
    pub fn has_regular(&self) -> bool {
        self.discount_id.is_some()
    }

    /// True when the selected discount is the senior-citizen discount.
    pub fn is_senior(&self) -> bool {
        self.discount_name
            .as_deref()
            .is_some_and(is_senior_discount_name)
    }

    /// True when a senior discount is selected but no ID has been given.
    pub fn is_senior_id_missing(&self) -> bool {
        self.is_senior() && self.senior_id.trim().is_empty()
    }
}
