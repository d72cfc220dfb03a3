//! Line item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single product/service row on a bill.
///
/// `amount` is derived from `quantity × rate` and recomputed on every
/// edit; the serial number shown beside a row is its position in the
/// bill, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    /// Build a line item, clamping negative inputs to zero.
    pub fn new(name: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        let quantity = quantity.max(Decimal::ZERO);
        let rate = rate.max(Decimal::ZERO);
        Self {
            name: name.into(),
            quantity,
            rate,
            amount: quantity * rate,
        }
    }

    /// True when the row carries no data at all. Such rows are dropped at
    /// collection time instead of failing validation.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.quantity.is_zero() && self.rate.is_zero()
    }
}
