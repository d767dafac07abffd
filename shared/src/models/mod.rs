//! Data models
//!
//! `Product` is the one shape every catalog is normalized to. The `Raw*`
//! wire types absorb the per-catalog differences in field names and value
//! encodings.

pub mod product;

pub use product::{MAX_PRICE, NormalizeError, Product, RawId, RawImage, RawPrice, RawProduct};
