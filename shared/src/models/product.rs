//! Product Model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum price accepted for a single unit
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Whether `price` is finite and within `0..=MAX_PRICE`
#[inline]
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && (0.0..=MAX_PRICE).contains(&price)
}

/// Product snapshot as shown in a catalog listing
///
/// Immutable once built; cart lines hold a clone and replace it wholesale
/// when the same product is added again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    /// List price before discount
    pub price_original: f64,
    /// Price the shopper pays
    pub price_discounted: f64,
    /// Hidden products are fetched but not rendered
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_note: Option<String>,
    /// First image URL
    pub image_ref: String,
}

impl Product {
    /// Amount saved per unit (never negative)
    pub fn savings(&self) -> f64 {
        (self.price_original - self.price_discounted).max(0.0)
    }

    /// Both prices finite and within `0..=MAX_PRICE`
    pub fn has_valid_prices(&self) -> bool {
        is_valid_price(self.price_original) && is_valid_price(self.price_discounted)
    }
}

/// Product identifier as sent by a catalog (`"_id": "abc"` or `"id": 12`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Image field: a single URL or a gallery of URLs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Single(String),
    Gallery(Vec<String>),
}

impl RawImage {
    fn first(self) -> Option<String> {
        match self {
            RawImage::Single(url) => Some(url),
            RawImage::Gallery(urls) => urls.into_iter().next(),
        }
    }
}

/// Price field: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    fn value(&self) -> Option<f64> {
        let v = match self {
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s.trim().replace(',', "").parse().ok()?,
        };
        is_valid_price(v).then_some(v)
    }
}

/// Product as returned by a catalog endpoint, before normalization
///
/// Men's listings use `title`, `price` and an image array; women's use
/// `heading`, `original_price`/`discount_price` and a single image;
/// electronics add a `visible` flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, alias = "_id")]
    pub id: Option<RawId>,
    #[serde(default, alias = "heading")]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub original_price: Option<RawPrice>,
    #[serde(default)]
    pub discount_price: Option<RawPrice>,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default, alias = "availability", alias = "stock_status")]
    pub availability_note: Option<String>,
}

/// Why a wire product could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("product is missing an id")]
    MissingId,
    #[error("product {0} is missing a title")]
    MissingTitle(String),
    #[error("product {0} has no usable price")]
    MissingPrice(String),
}

impl TryFrom<RawProduct> for Product {
    type Error = NormalizeError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .map(RawId::into_string)
            .filter(|id| !id.is_empty())
            .ok_or(NormalizeError::MissingId)?;

        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| NormalizeError::MissingTitle(id.clone()))?;

        let plain = raw.price.as_ref().and_then(RawPrice::value);
        let price_discounted = raw
            .discount_price
            .as_ref()
            .and_then(RawPrice::value)
            .or(plain)
            .ok_or_else(|| NormalizeError::MissingPrice(id.clone()))?;
        let price_original = raw
            .original_price
            .as_ref()
            .and_then(RawPrice::value)
            .or(plain)
            .unwrap_or(price_discounted);

        Ok(Product {
            id,
            title,
            price_original,
            price_discounted,
            visible: raw.visible.unwrap_or(true),
            availability_note: raw.availability_note.filter(|n| !n.trim().is_empty()),
            image_ref: raw.image.and_then(RawImage::first).unwrap_or_default(),
        })
    }
}
