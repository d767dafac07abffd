//! Live catalog query for one page
//!
//! Holds the canonical [`CatalogQuery`] behind a watch channel. Setters
//! run the pure transitions from `shared::catalog`; a rejected transition
//! leaves the published query untouched, and a transition that produces
//! an equal query does not wake subscribers.

use parking_lot::Mutex;
use shared::catalog::{CatalogKind, CatalogQuery, QueryError, SortOrder};
use tokio::sync::watch;

pub struct QueryStateController {
    query_tx: watch::Sender<CatalogQuery>,
    /// Page bound from the last successful fetch
    total_pages: Mutex<Option<u32>>,
}

impl QueryStateController {
    pub fn new(initial: CatalogQuery) -> Self {
        let (query_tx, _) = watch::channel(initial);
        Self {
            query_tx,
            total_pages: Mutex::new(None),
        }
    }

    pub fn for_catalog(kind: CatalogKind) -> Self {
        Self::new(CatalogQuery::for_catalog(kind))
    }

    /// Snapshot of the current query
    pub fn current(&self) -> CatalogQuery {
        self.query_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogQuery> {
        self.query_tx.subscribe()
    }

    pub fn total_pages(&self) -> Option<u32> {
        *self.total_pages.lock()
    }

    /// Record the page count reported by a successful fetch
    pub fn set_total_pages(&self, total_pages: u32) {
        *self.total_pages.lock() = Some(total_pages);
    }

    pub fn set_category(&self, category: &str) -> CatalogQuery {
        self.apply(|q| q.with_category(category))
    }

    pub fn set_brand(&self, brand: &str) -> CatalogQuery {
        self.apply(|q| q.with_brand(brand))
    }

    pub fn set_sort_field(&self, field: &str) -> CatalogQuery {
        self.apply(|q| q.with_sort_field(field))
    }

    /// Rejected with [`QueryError::CategoryRequired`] while the category is "All"
    pub fn set_sort_order(&self, order: Option<SortOrder>) -> Result<CatalogQuery, QueryError> {
        self.try_apply(|q| q.with_sort_order(order))
    }

    /// Rejected with [`QueryError::PageOutOfRange`] outside `1..=total_pages`
    pub fn set_page(&self, page: u32) -> Result<CatalogQuery, QueryError> {
        let total_pages = self.total_pages();
        self.try_apply(|q| q.with_page(page, total_pages))
    }

    pub fn set_limit(&self, limit: u32) -> Result<CatalogQuery, QueryError> {
        self.try_apply(|q| q.with_limit(limit))
    }

    pub fn set_search_term(&self, term: &str) -> CatalogQuery {
        self.apply(|q| q.with_search_term(term))
    }

    /// Replace the whole query, e.g. one decoded from a bookmarked URL
    pub fn restore(&self, query: CatalogQuery) -> Result<CatalogQuery, QueryError> {
        query.validate()?;
        Ok(self.apply(|_| query))
    }

    fn apply<F>(&self, transition: F) -> CatalogQuery
    where
        F: FnOnce(&CatalogQuery) -> CatalogQuery,
    {
        let mut applied = None;
        self.query_tx.send_if_modified(|current| {
            let next = transition(current);
            let changed = next != *current;
            if changed {
                *current = next.clone();
            }
            applied = Some(next);
            changed
        });
        applied.unwrap_or_else(|| self.current())
    }

    fn try_apply<F>(&self, transition: F) -> Result<CatalogQuery, QueryError>
    where
        F: FnOnce(&CatalogQuery) -> Result<CatalogQuery, QueryError>,
    {
        let mut rejected = None;
        let query = self.apply(|current| match transition(current) {
            Ok(next) => next,
            Err(err) => {
                rejected = Some(err);
                current.clone()
            }
        });
        match rejected {
            Some(err) => {
                tracing::warn!(error = %err, "Rejected query change");
                Err(err)
            }
            None => Ok(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_catalog() {
        assert_eq!(QueryStateController::for_catalog(CatalogKind::Men).current().limit(), 20);
        assert_eq!(
            QueryStateController::for_catalog(CatalogKind::Electronics)
                .current()
                .limit(),
            25
        );
    }

    #[test]
    fn test_setters_reset_page() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Women);
        ctrl.set_total_pages(5);
        assert_eq!(ctrl.set_page(3).unwrap().page(), 3);

        assert_eq!(ctrl.set_brand("Zara").page(), 1);
        ctrl.set_page(3).unwrap();
        assert_eq!(ctrl.set_search_term("dress").page(), 1);
        ctrl.set_page(3).unwrap();
        assert_eq!(ctrl.set_limit(40).unwrap().page(), 1);
        ctrl.set_page(3).unwrap();
        assert_eq!(ctrl.set_category("Shoes").page(), 1);
    }

    #[test]
    fn test_sort_order_requires_category() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Men);
        let before = ctrl.current();

        assert_eq!(
            ctrl.set_sort_order(Some(SortOrder::Asc)),
            Err(QueryError::CategoryRequired)
        );
        assert_eq!(ctrl.set_sort_order(None), Err(QueryError::CategoryRequired));
        assert_eq!(ctrl.current(), before);

        ctrl.set_category("Shirts");
        let query = ctrl.set_sort_order(Some(SortOrder::Desc)).unwrap();
        assert_eq!(query.sort_order(), Some(SortOrder::Desc));
    }

    #[test]
    fn test_page_out_of_range_is_rejected() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Men);
        // unknown bound: only page 1
        assert!(ctrl.set_page(2).is_err());

        ctrl.set_total_pages(3);
        assert_eq!(
            ctrl.set_page(5),
            Err(QueryError::PageOutOfRange {
                page: 5,
                total_pages: 3
            })
        );
        assert_eq!(ctrl.set_page(0).unwrap_err().to_string(), "page 0 is outside 1..=3");
        assert_eq!(ctrl.current().page(), 1);
    }

    #[test]
    fn test_limit_not_allowed() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Men);
        assert_eq!(ctrl.set_limit(15), Err(QueryError::LimitNotAllowed(15)));
        assert_eq!(ctrl.current().limit(), 20);
    }

    #[test]
    fn test_unchanged_query_does_not_notify() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Men);
        let mut rx = ctrl.subscribe();

        ctrl.set_category("All");
        assert!(!rx.has_changed().unwrap());

        ctrl.set_category("Jeans");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().category(), "Jeans");

        assert!(ctrl.set_limit(7).is_err());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_restore() {
        let ctrl = QueryStateController::for_catalog(CatalogKind::Men);
        let saved = CatalogQuery::for_catalog(CatalogKind::Men)
            .with_category("Jackets")
            .with_search_term("leather");
        assert_eq!(ctrl.restore(saved.clone()).unwrap(), saved);
        assert_eq!(ctrl.current(), saved);
    }
}
