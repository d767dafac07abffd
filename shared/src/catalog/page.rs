//! Listing response normalization
//!
//! Every catalog endpoint answers with its own list field plus optional
//! pagination metadata. `CatalogPage::from_response` turns that body into
//! normalized products and a page bound.

use super::kind::CatalogKind;
use super::query::CatalogQuery;
use crate::error::{AppError, ErrorCode};
use crate::models::{Product, RawProduct};
use serde::Serialize;
use serde_json::Value;

/// One page of normalized listing results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<Product>,
    /// Page bound for the query that produced this page
    pub total_pages: u32,
    /// Total matching products, when the service reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Entries dropped because they could not be normalized
    #[serde(skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl CatalogPage {
    /// Normalize a listing body for `kind`, fetched with `query`
    ///
    /// The product array is read from the catalog's list field; a bare
    /// array body is accepted as well. Entries that cannot be normalized
    /// are skipped, not fatal.
    pub fn from_response(
        kind: CatalogKind,
        query: &CatalogQuery,
        body: Value,
    ) -> Result<Self, AppError> {
        let (entries, declared_pages, total) = match body {
            Value::Array(entries) => (entries, None, None),
            Value::Object(mut map) => {
                let entries = match map.remove(kind.list_field()) {
                    Some(Value::Array(entries)) => entries,
                    Some(_) | None => {
                        return Err(AppError::with_message(
                            ErrorCode::CatalogResponseInvalid,
                            format!("response has no '{}' list", kind.list_field()),
                        ));
                    }
                };
                let declared = first_u64(&map, &["totalPages", "total_pages"]);
                let total = first_u64(&map, &["total", "totalCount", "total_count"]);
                (entries, declared, total)
            }
            _ => {
                return Err(AppError::with_message(
                    ErrorCode::CatalogResponseInvalid,
                    "response body is not a JSON object",
                ));
            }
        };

        let received = entries.len();
        let mut items = Vec::with_capacity(received);
        let mut skipped = 0;
        for entry in entries {
            let normalized = serde_json::from_value::<RawProduct>(entry)
                .map_err(|e| e.to_string())
                .and_then(|raw| Product::try_from(raw).map_err(|e| e.to_string()));
            match normalized {
                Ok(product) => items.push(product),
                Err(reason) => {
                    skipped += 1;
                    tracing::warn!(catalog = %kind, %reason, "Skipping catalog entry");
                }
            }
        }

        let total_pages = derive_total_pages(declared_pages, total, query, received);

        Ok(Self {
            items,
            total_pages,
            total,
            skipped,
        })
    }

    /// Products that should be rendered
    pub fn visible_items(&self) -> impl Iterator<Item = &Product> {
        self.items.iter().filter(|p| p.visible)
    }
}

fn first_u64(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| map.get(*k).and_then(Value::as_u64))
}

/// Page bound from response metadata only
///
/// Declared `totalPages` wins; otherwise it is computed from `total` and
/// the page size; otherwise a full page means at least one more page
/// exists and a short page is the last one.
fn derive_total_pages(
    declared: Option<u64>,
    total: Option<u64>,
    query: &CatalogQuery,
    received: usize,
) -> u32 {
    let pages = match (declared, total) {
        (Some(declared), _) => declared,
        (None, Some(total)) => total.div_ceil(u64::from(query.limit())),
        (None, None) => {
            let page = u64::from(query.page());
            if received as u64 >= u64::from(query.limit()) {
                page + 1
            } else {
                page
            }
        }
    };
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
