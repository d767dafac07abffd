//! Cart reducer
//!
//! `reduce` is a pure function: it never touches its input, performs no
//! I/O and either returns the next state or an error with the input left
//! as it was. Notifications and analytics belong to the caller.

use super::action::CartAction;
use super::error::CartError;
use super::state::{CartItem, CartState, MAX_QUANTITY};
use crate::models::Product;
use serde::Deserialize;
use serde_json::Value;

/// Apply one action to a cart
pub fn reduce(state: &CartState, action: &CartAction) -> Result<CartState, CartError> {
    let mut next = state.clone();
    match action {
        CartAction::AddToCart(product) => apply_add(&mut next, product)?,
        CartAction::RemoveFromCart { product_id } => apply_remove(&mut next, product_id),
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => apply_update_quantity(&mut next, product_id, *quantity)?,
        CartAction::ClearCart => next.items_mut().clear(),
    }
    Ok(next)
}

/// Apply an action received as JSON
///
/// Unknown action types and payloads with missing or mistyped fields are
/// rejected with [`CartError::MalformedAction`].
pub fn reduce_raw(state: &CartState, raw: &Value) -> Result<CartState, CartError> {
    let action = parse_action(raw)?;
    reduce(state, &action)
}

/// Parse a JSON action without applying it
pub fn parse_action(raw: &Value) -> Result<CartAction, CartError> {
    CartAction::deserialize(raw).map_err(|e| {
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<missing type>");
        tracing::warn!(action = kind, error = %e, "Rejected malformed cart action");
        CartError::MalformedAction(format!("{kind}: {e}"))
    })
}

/// Existing line: one more unit and a refreshed snapshot. New line:
/// appended with quantity 1. Prices must be within `0..=MAX_PRICE`.
fn apply_add(state: &mut CartState, product: &Product) -> Result<(), CartError> {
    if !product.has_valid_prices() {
        return Err(CartError::InvalidPrice(product.id.clone()));
    }

    let Some(idx) = state.position(&product.id) else {
        state.items_mut().push(CartItem::new(product.clone()));
        return Ok(());
    };

    let item = &mut state.items_mut()[idx];
    if item.quantity >= MAX_QUANTITY {
        return Err(CartError::QuantityLimitExceeded {
            quantity: i64::from(item.quantity) + 1,
            max: MAX_QUANTITY,
        });
    }
    item.quantity += 1;
    item.product = product.clone();
    Ok(())
}

/// Absent ids leave the state as it was
fn apply_remove(state: &mut CartState, product_id: &str) {
    if let Some(idx) = state.position(product_id) {
        state.items_mut().remove(idx);
    }
}

/// Quantities below 1 are rejected; deleting a line is REMOVE_FROM_CART's
/// job. Absent ids leave the state as it was.
fn apply_update_quantity(
    state: &mut CartState,
    product_id: &str,
    quantity: i64,
) -> Result<(), CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity(quantity));
    }
    if quantity > i64::from(MAX_QUANTITY) {
        return Err(CartError::QuantityLimitExceeded {
            quantity,
            max: MAX_QUANTITY,
        });
    }
    if let Some(idx) = state.position(product_id) {
        // Bounded by MAX_QUANTITY above
        state.items_mut()[idx].quantity = quantity as u32;
    }
    Ok(())
}
