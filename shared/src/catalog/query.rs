//! Canonical catalog query
//!
//! `CatalogQuery` is only changed through its transition methods, each of
//! which returns a new query and keeps the invariants:
//! - `page >= 1`
//! - `limit` is one of [`ALLOWED_LIMITS`]
//! - `sort_order` is set only while a category is selected

use super::error::QueryError;
use super::kind::CatalogKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sentinel for "no filter" on category and brand
pub const ALL: &str = "All";

/// Page sizes offered by the listing
pub const ALLOWED_LIMITS: [u32; 6] = [10, 20, 25, 30, 40, 50];

/// Page size used when a parameter set does not carry one
pub const DEFAULT_LIMIT: u32 = 20;

/// Flat parameter keys, shared by the listing endpoint and bookmarks
pub mod param {
    pub const PAGE: &str = "page";
    pub const LIMIT: &str = "limit";
    pub const CATEGORY: &str = "category";
    pub const BRAND: &str = "brand";
    pub const SORT: &str = "sort";
    pub const ORDER: &str = "order";
    pub const SEARCH: &str = "search";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::invalid_param(param::ORDER, other)),
        }
    }
}

/// The filter/sort/page/search state driving one listing fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    page: u32,
    limit: u32,
    category: String,
    brand: String,
    sort_field: Option<String>,
    sort_order: Option<SortOrder>,
    search_term: String,
}

impl CatalogQuery {
    /// Query for page 1 with no filters
    pub fn new(limit: u32) -> Result<Self, QueryError> {
        check_limit(limit)?;
        Ok(Self {
            page: 1,
            limit,
            category: ALL.to_string(),
            brand: ALL.to_string(),
            sort_field: None,
            sort_order: None,
            search_term: String::new(),
        })
    }

    /// Default query for a catalog page
    pub fn for_catalog(kind: CatalogKind) -> Self {
        Self::new(kind.default_limit()).unwrap_or_default()
    }

    // ========== Accessors ==========

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn has_category(&self) -> bool {
        self.category != ALL
    }

    pub fn has_brand(&self) -> bool {
        self.brand != ALL
    }

    // ========== Transitions ==========

    /// Select a category; `"All"` or an empty value clears the filter
    ///
    /// Clearing the category also clears the sort order.
    pub fn with_category(&self, category: &str) -> Self {
        let category = filter_value(category);
        let mut next = self.first_page();
        if category == ALL {
            next.sort_order = None;
        }
        next.category = category;
        next
    }

    /// Select a brand; `"All"` or an empty value clears the filter
    pub fn with_brand(&self, brand: &str) -> Self {
        let mut next = self.first_page();
        next.brand = filter_value(brand);
        next
    }

    /// Choose the field to sort by; an empty value clears sorting
    ///
    /// Picking a field while a category is selected and no order is set
    /// defaults the order to ascending.
    pub fn with_sort_field(&self, field: &str) -> Self {
        let field = field.trim();
        let mut next = self.first_page();
        if field.is_empty() {
            next.sort_field = None;
            next.sort_order = None;
        } else {
            next.sort_field = Some(field.to_string());
            if next.has_category() && next.sort_order.is_none() {
                next.sort_order = Some(SortOrder::Asc);
            }
        }
        next
    }

    /// Choose the sort direction
    ///
    /// Always rejected while no category is selected.
    pub fn with_sort_order(&self, order: Option<SortOrder>) -> Result<Self, QueryError> {
        if !self.has_category() {
            return Err(QueryError::CategoryRequired);
        }
        let mut next = self.first_page();
        next.sort_order = order;
        Ok(next)
    }

    /// Move to another page of the current result set
    ///
    /// `total_pages` is the bound reported by the last successful fetch;
    /// while it is unknown only page 1 is reachable. Out-of-range pages are
    /// rejected, never clamped.
    pub fn with_page(&self, page: u32, total_pages: Option<u32>) -> Result<Self, QueryError> {
        let total_pages = total_pages.unwrap_or(1).max(1);
        if page < 1 || page > total_pages {
            return Err(QueryError::PageOutOfRange { page, total_pages });
        }
        let mut next = self.clone();
        next.page = page;
        Ok(next)
    }

    /// Change the page size
    pub fn with_limit(&self, limit: u32) -> Result<Self, QueryError> {
        check_limit(limit)?;
        let mut next = self.first_page();
        next.limit = limit;
        Ok(next)
    }

    /// Replace the free-text search term
    pub fn with_search_term(&self, term: &str) -> Self {
        let mut next = self.first_page();
        next.search_term = term.to_string();
        next
    }

    fn first_page(&self) -> Self {
        Self {
            page: 1,
            ..self.clone()
        }
    }

    // ========== Flat parameter codec ==========

    /// Encode as a flat key/value set
    ///
    /// Unset sort values are encoded as empty strings so the set always
    /// carries every key.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            (param::PAGE, self.page.to_string()),
            (param::LIMIT, self.limit.to_string()),
            (param::CATEGORY, self.category.clone()),
            (param::BRAND, self.brand.clone()),
            (param::SORT, self.sort_field.clone().unwrap_or_default()),
            (
                param::ORDER,
                self.sort_order
                    .map(|o| o.as_str().to_string())
                    .unwrap_or_default(),
            ),
            (param::SEARCH, self.search_term.clone()),
        ]
    }

    /// Decode a flat key/value set
    ///
    /// Missing keys take their defaults and unknown keys are ignored. The
    /// decoded query must satisfy the same invariants as one built through
    /// the transitions.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                param::PAGE => {
                    query.page = value
                        .parse()
                        .ok()
                        .filter(|p| *p >= 1)
                        .ok_or_else(|| QueryError::invalid_param(param::PAGE, value))?;
                }
                param::LIMIT => {
                    query.limit = value
                        .parse()
                        .map_err(|_| QueryError::invalid_param(param::LIMIT, value))?;
                }
                param::CATEGORY => query.category = filter_value(value),
                param::BRAND => query.brand = filter_value(value),
                param::SORT => {
                    let field = value.trim();
                    query.sort_field = (!field.is_empty()).then(|| field.to_string());
                }
                param::ORDER => {
                    query.sort_order = if value.is_empty() {
                        None
                    } else {
                        Some(value.parse()?)
                    };
                }
                param::SEARCH => query.search_term = value.to_string(),
                _ => {}
            }
        }
        query.validate()?;
        Ok(query)
    }

    /// Check the invariants on a query that did not come from the transitions
    pub fn validate(&self) -> Result<(), QueryError> {
        check_limit(self.limit)?;
        if self.page < 1 {
            return Err(QueryError::invalid_param(param::PAGE, self.page.to_string()));
        }
        if self.sort_order.is_some() && !self.has_category() {
            return Err(QueryError::CategoryRequired);
        }
        Ok(())
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            category: ALL.to_string(),
            brand: ALL.to_string(),
            sort_field: None,
            sort_order: None,
            search_term: String::new(),
        }
    }
}

fn check_limit(limit: u32) -> Result<(), QueryError> {
    if ALLOWED_LIMITS.contains(&limit) {
        Ok(())
    } else {
        Err(QueryError::LimitNotAllowed(limit))
    }
}

fn filter_value(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        ALL.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirts_query() -> CatalogQuery {
        CatalogQuery::for_catalog(CatalogKind::Men)
            .with_category("Shirts")
            .with_brand("Roadster")
            .with_sort_field("price")
            .with_sort_order(Some(SortOrder::Desc))
            .unwrap()
            .with_search_term("linen shirt")
    }

    #[test]
    fn test_defaults() {
        let q = CatalogQuery::for_catalog(CatalogKind::Electronics);
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 25);
        assert_eq!(q.category(), ALL);
        assert_eq!(q.brand(), ALL);
        assert_eq!(q.sort_field(), None);
        assert_eq!(q.sort_order(), None);
        assert_eq!(q.search_term(), "");
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let q = CatalogQuery::default().with_page(3, Some(5)).unwrap();
        assert_eq!(q.page(), 3);

        assert_eq!(q.with_category("Jeans").page(), 1);
        assert_eq!(q.with_brand("Levis").page(), 1);
        assert_eq!(q.with_sort_field("title").page(), 1);
        assert_eq!(q.with_search_term("denim").page(), 1);
        assert_eq!(q.with_limit(40).unwrap().page(), 1);
    }

    #[test]
    fn test_sort_order_requires_category() {
        let q = CatalogQuery::default();
        assert_eq!(
            q.with_sort_order(Some(SortOrder::Asc)),
            Err(QueryError::CategoryRequired)
        );
        assert_eq!(q.with_sort_order(None), Err(QueryError::CategoryRequired));
    }

    #[test]
    fn test_clearing_category_clears_order() {
        let q = shirts_query();
        assert_eq!(q.sort_order(), Some(SortOrder::Desc));

        let cleared = q.with_category("All");
        assert_eq!(cleared.category(), ALL);
        assert_eq!(cleared.sort_order(), None);
        assert_eq!(cleared.sort_field(), Some("price"));
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn test_sort_field_defaults_order_only_with_category() {
        let without = CatalogQuery::default().with_sort_field("price");
        assert_eq!(without.sort_field(), Some("price"));
        assert_eq!(without.sort_order(), None);

        let with = CatalogQuery::default()
            .with_category("Watches")
            .with_sort_field("price");
        assert_eq!(with.sort_order(), Some(SortOrder::Asc));

        let cleared = with.with_sort_field("");
        assert_eq!(cleared.sort_field(), None);
        assert_eq!(cleared.sort_order(), None);
    }

    #[test]
    fn test_limit_validation() {
        let q = CatalogQuery::default();
        assert_eq!(q.with_limit(15), Err(QueryError::LimitNotAllowed(15)));
        assert_eq!(q.with_limit(50).unwrap().limit(), 50);
        assert!(CatalogQuery::new(0).is_err());
    }

    #[test]
    fn test_page_bounds_are_rejected_not_clamped() {
        let q = CatalogQuery::default();
        assert_eq!(
            q.with_page(5, Some(3)),
            Err(QueryError::PageOutOfRange {
                page: 5,
                total_pages: 3
            })
        );
        assert!(q.with_page(0, Some(3)).is_err());
        assert_eq!(q.with_page(3, Some(3)).unwrap().page(), 3);
    }

    #[test]
    fn test_unknown_bounds_allow_only_first_page() {
        let q = CatalogQuery::default();
        assert!(q.with_page(1, None).is_ok());
        assert!(q.with_page(2, None).is_err());
    }

    #[test]
    fn test_params_round_trip() {
        let queries = [
            CatalogQuery::default(),
            CatalogQuery::for_catalog(CatalogKind::Electronics),
            shirts_query(),
            shirts_query().with_page(4, Some(9)).unwrap(),
            CatalogQuery::default()
                .with_brand("Puma")
                .with_sort_field("title")
                .with_search_term("  spaced  term "),
        ];

        for query in queries {
            let decoded = CatalogQuery::from_params(query.to_params()).unwrap();
            assert_eq!(decoded, query);
        }
    }

    #[test]
    fn test_from_params_defaults_and_unknown_keys() {
        let q = CatalogQuery::from_params([("category", ""), ("utm_source", "mail")]).unwrap();
        assert_eq!(q, CatalogQuery::default());
    }

    #[test]
    fn test_from_params_rejects_invalid_sets() {
        assert_eq!(
            CatalogQuery::from_params([("order", "asc")]),
            Err(QueryError::CategoryRequired)
        );
        assert_eq!(
            CatalogQuery::from_params([("limit", "15")]),
            Err(QueryError::LimitNotAllowed(15))
        );
        assert!(CatalogQuery::from_params([("page", "0")]).is_err());
        assert!(CatalogQuery::from_params([("page", "two")]).is_err());
        assert!(CatalogQuery::from_params([("category", "Shirts"), ("order", "up")]).is_err());
    }
}
