//! Shared types for the storefront
//!
//! Product and catalog query shapes, the cart state machine and the
//! unified error system. Everything in this crate is synchronous and free
//! of side effects; the client crate owns I/O, timers and publishing.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{CartAction, CartError, CartItem, CartState, CartSummary};
pub use catalog::{CatalogKind, CatalogPage, CatalogQuery, QueryError, SortOrder};
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::Product;
