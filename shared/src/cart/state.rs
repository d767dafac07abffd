//! Cart state

use super::summary::CartSummary;
use crate::models::Product;
use serde::{Deserialize, Serialize};

/// Maximum quantity a single cart line may hold
pub const MAX_QUANTITY: u32 = 9999;

/// One product line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub product: Product,
    /// Always in `1..=MAX_QUANTITY`
    pub quantity: u32,
}

impl CartItem {
    pub(crate) fn new(product: Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product,
            quantity: 1,
        }
    }
}

/// Cart contents, keyed by product id in insertion order
///
/// Only the reducer builds new states, so ids stay unique and every
/// quantity stays at least 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.position(product_id).is_some()
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::from_state(self)
    }

    pub(crate) fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<CartItem> {
        &mut self.items
    }
}
