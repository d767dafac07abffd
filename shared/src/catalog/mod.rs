//! Catalog listing types
//!
//! - [`CatalogKind`]: which collection a page shows
//! - [`CatalogQuery`]: canonical filter/sort/page/search state
//! - [`CatalogPage`]: normalized listing response

mod error;
mod kind;
mod page;
pub mod query;

pub use error::QueryError;
pub use kind::CatalogKind;
pub use page::CatalogPage;
pub use query::{ALL, ALLOWED_LIMITS, CatalogQuery, DEFAULT_LIMIT, SortOrder, param};
