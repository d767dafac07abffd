//! Cart actions

use crate::models::Product;
use serde::{Deserialize, Serialize};

/// Everything that can change a cart
///
/// Wire form is `{ "type": "ADD_TO_CART", "payload": { ... } }`; the
/// payload is omitted for `CLEAR_CART`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Add one unit of a product
    AddToCart(Product),
    /// Drop a line entirely
    #[serde(rename_all = "camelCase")]
    RemoveFromCart { product_id: String },
    /// Set a line's quantity; values below 1 are rejected
    #[serde(rename_all = "camelCase")]
    UpdateQuantity { product_id: String, quantity: i64 },
    /// Empty the cart
    ClearCart,
}

impl CartAction {
    pub fn add(product: Product) -> Self {
        Self::AddToCart(product)
    }

    pub fn remove(product_id: impl Into<String>) -> Self {
        Self::RemoveFromCart {
            product_id: product_id.into(),
        }
    }

    pub fn update_quantity(product_id: impl Into<String>, quantity: i64) -> Self {
        Self::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Action type as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "ADD_TO_CART",
            Self::RemoveFromCart { .. } => "REMOVE_FROM_CART",
            Self::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            Self::ClearCart => "CLEAR_CART",
        }
    }
}
