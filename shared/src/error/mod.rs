//! Unified error system for the storefront
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! Layer-specific errors (`QueryError`, `CartError`) live next to the code
//! that raises them and convert into [`AppError`].
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CategoryRequired);
//! assert_eq!(err.message, "Please select category first");
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "limit");
//! assert!(err.details.is_some());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
