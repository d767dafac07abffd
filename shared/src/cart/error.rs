//! Cart errors

use crate::error::{AppError, ErrorCode};
use thiserror::Error;

/// A cart action the reducer refused; the cart is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("quantity {quantity} exceeds the maximum of {max}")]
    QuantityLimitExceeded { quantity: i64, max: u32 },

    #[error("malformed cart action: {0}")]
    MalformedAction(String),

    #[error("product {0} has a price outside 0..=1000000")]
    InvalidPrice(String),
}

impl CartError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidQuantity(_) => ErrorCode::CartInvalidQuantity,
            Self::QuantityLimitExceeded { .. } => ErrorCode::CartQuantityLimitExceeded,
            Self::MalformedAction(_) => ErrorCode::CartMalformedAction,
            Self::InvalidPrice(_) => ErrorCode::CartInvalidPrice,
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        AppError::with_message(err.code(), err.to_string())
    }
}
