//! Shopping cart state machine
//!
//! [`reduce`] maps `(CartState, CartAction)` to the next state. The client
//! crate's `CartStore` is the only holder of a live cart; everything here
//! is plain data.

mod action;
mod error;
mod reducer;
mod state;
mod summary;

pub use action::CartAction;
pub use error::CartError;
pub use reducer::{parse_action, reduce, reduce_raw};
pub use state::{CartItem, CartState, MAX_QUANTITY};
pub use summary::CartSummary;
