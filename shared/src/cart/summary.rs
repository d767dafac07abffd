//! Cart totals using rust_decimal for precision
//!
//! Product prices are `f64` on the wire; totals are summed as `Decimal`
//! and rounded to 2 decimal places so `0.1 + 0.2` style drift never
//! reaches a price label.

use super::state::CartState;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite input counts as zero
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Derived totals for a cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Distinct products
    pub line_count: usize,
    /// Sum of quantities
    pub item_count: u32,
    pub original_total: Decimal,
    pub discounted_total: Decimal,
    pub savings: Decimal,
}

impl CartSummary {
    pub fn from_state(state: &CartState) -> Self {
        let mut original_total = Decimal::ZERO;
        let mut discounted_total = Decimal::ZERO;

        for item in state.items() {
            let qty = Decimal::from(item.quantity);
            original_total = original_total
                .saturating_add(to_decimal(item.product.price_original).saturating_mul(qty));
            discounted_total = discounted_total
                .saturating_add(to_decimal(item.product.price_discounted).saturating_mul(qty));
        }

        let original_total = original_total.round_dp(DECIMAL_PLACES);
        let discounted_total = discounted_total.round_dp(DECIMAL_PLACES);
        let savings = original_total
            .saturating_sub(discounted_total)
            .max(Decimal::ZERO)
            .round_dp(DECIMAL_PLACES);

        Self {
            line_count: state.len(),
            item_count: state.total_quantity(),
            original_total,
            discounted_total,
            savings,
        }
    }

    /// Amount due as f64, for display layers that want a plain number
    pub fn amount_due(&self) -> f64 {
        self.discounted_total.to_f64().unwrap_or_default()
    }
}
