//! Catalog page controllers
//!
//! A [`PageController`] wires one catalog's query state, fetcher and the
//! shared cart together. Query changes trigger a fetch; rejected changes
//! become warnings for the shopper. Analytics and toasts are sent here,
//! after the cart has accepted an action, never from the reducer.

use crate::cart_store::CartStore;
use crate::collaborators::{
    Analytics, AnalyticsEvent, ErrorReporter, LogSink, Notification, Notifier,
};
use crate::config::StorefrontConfig;
use crate::fetcher::{CatalogFetcher, FetchState};
use crate::http::CatalogSource;
use crate::query_state::QueryStateController;
use parking_lot::Mutex;
use shared::cart::{CartAction, CartState};
use shared::catalog::{CatalogKind, CatalogQuery, SortOrder};
use shared::error::AppError;
use shared::models::Product;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// External side-effect sinks shared by every page
#[derive(Clone)]
pub struct Collaborators {
    pub analytics: Arc<dyn Analytics>,
    pub notifier: Arc<dyn Notifier>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            analytics: Arc::new(LogSink),
            notifier: Arc::new(LogSink),
            reporter: Arc::new(LogSink),
        }
    }
}

pub struct PageController {
    kind: CatalogKind,
    query: Arc<QueryStateController>,
    fetcher: Arc<CatalogFetcher>,
    cart: Arc<CartStore>,
    analytics: Arc<dyn Analytics>,
    notifier: Arc<dyn Notifier>,
    /// Last query a fetch was issued for
    query_rx: Mutex<watch::Receiver<CatalogQuery>>,
}

impl PageController {
    pub fn new(
        kind: CatalogKind,
        config: &StorefrontConfig,
        source: Arc<dyn CatalogSource>,
        cart: Arc<CartStore>,
        collaborators: &Collaborators,
    ) -> Self {
        let query = Arc::new(QueryStateController::for_catalog(kind));
        let fetcher = Arc::new(CatalogFetcher::new(
            kind,
            source,
            collaborators.reporter.clone(),
            config.request_timeout(),
        ));
        let query_rx = Mutex::new(query.subscribe());
        Self {
            kind,
            query,
            fetcher,
            cart,
            analytics: collaborators.analytics.clone(),
            notifier: collaborators.notifier.clone(),
            query_rx,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn query(&self) -> CatalogQuery {
        self.query.current()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetcher.state()
    }

    pub fn subscribe_fetch(&self) -> watch::Receiver<FetchState> {
        self.fetcher.subscribe()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<CatalogQuery> {
        self.query.subscribe()
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    // ========== Listing ==========

    /// Fetch the current query in the background
    ///
    /// The request number is taken here, together with the query, so a
    /// later call always supersedes an earlier one whatever order the
    /// tasks run in. The task yields the published state, or `None` if a
    /// newer fetch superseded it. A successful fetch updates the page
    /// bound used by [`Self::set_page`].
    pub fn refresh(&self) -> JoinHandle<Option<FetchState>> {
        let (query, request_seq) = {
            let mut rx = self.query_rx.lock();
            let query = rx.borrow_and_update().clone();
            (query, self.fetcher.begin())
        };
        let fetcher = self.fetcher.clone();
        let query_state = self.query.clone();
        tokio::spawn(async move {
            let state = fetcher.complete(request_seq, &query).await;
            if let Some(total_pages) = state.as_ref().and_then(FetchState::total_pages) {
                query_state.set_total_pages(total_pages);
            }
            state
        })
    }

    /// Fetch only if the query moved since the last fetch
    fn refresh_if_changed(&self) -> Option<JoinHandle<Option<FetchState>>> {
        let changed = self.query_rx.lock().has_changed().unwrap_or(false);
        changed.then(|| self.refresh())
    }

    pub fn set_category(&self, category: &str) -> CatalogQuery {
        let query = self.query.set_category(category);
        self.refresh_if_changed();
        query
    }

    pub fn set_brand(&self, brand: &str) -> CatalogQuery {
        let query = self.query.set_brand(brand);
        self.refresh_if_changed();
        query
    }

    pub fn set_sort_field(&self, field: &str) -> CatalogQuery {
        let query = self.query.set_sort_field(field);
        self.refresh_if_changed();
        query
    }

    pub fn set_search_term(&self, term: &str) -> CatalogQuery {
        let query = self.query.set_search_term(term);
        self.refresh_if_changed();
        query
    }

    pub fn set_sort_order(&self, order: Option<SortOrder>) -> Result<CatalogQuery, AppError> {
        let result = self.query.set_sort_order(order);
        self.settle(result)
    }

    pub fn set_page(&self, page: u32) -> Result<CatalogQuery, AppError> {
        let result = self.query.set_page(page);
        self.settle(result)
    }

    pub fn set_limit(&self, limit: u32) -> Result<CatalogQuery, AppError> {
        let result = self.query.set_limit(limit);
        self.settle(result)
    }

    /// Go one page forward; rejected on the last page
    pub fn next_page(&self) -> Result<CatalogQuery, AppError> {
        let page = self.query.current().page().saturating_add(1);
        self.set_page(page)
    }

    /// Go one page back; rejected on the first page
    pub fn previous_page(&self) -> Result<CatalogQuery, AppError> {
        let page = self.query.current().page().saturating_sub(1);
        self.set_page(page)
    }

    /// Replace the query with one decoded from a URL
    pub fn restore(&self, query: CatalogQuery) -> Result<CatalogQuery, AppError> {
        let result = self.query.restore(query);
        self.settle(result)
    }

    fn settle<E>(&self, result: Result<CatalogQuery, E>) -> Result<CatalogQuery, AppError>
    where
        E: Into<AppError>,
    {
        match result {
            Ok(query) => {
                self.refresh_if_changed();
                Ok(query)
            }
            Err(err) => Err(self.reject(err.into())),
        }
    }

    fn reject(&self, err: AppError) -> AppError {
        self.notifier.notify(Notification::rejected(&err));
        err
    }

    // ========== Cart ==========

    /// Add one unit, then record analytics and confirm to the shopper
    pub fn add_to_cart(&self, product: &Product) -> Result<CartState, AppError> {
        let state = self
            .cart
            .dispatch(CartAction::add(product.clone()))
            .map_err(|e| self.reject(e.into()))?;

        self.analytics.track(AnalyticsEvent::AddToCart {
            product_name: product.title.clone(),
            product_price: product.price_discounted,
        });
        self.notifier.notify(Notification::added_to_cart(&product.title));
        Ok(state)
    }

    pub fn remove_from_cart(&self, product_id: &str) -> Result<CartState, AppError> {
        self.cart
            .dispatch(CartAction::remove(product_id))
            .map_err(|e| self.reject(e.into()))
    }

    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> Result<CartState, AppError> {
        self.cart
            .dispatch(CartAction::update_quantity(product_id, quantity))
            .map_err(|e| self.reject(e.into()))
    }

    pub fn clear_cart(&self) -> Result<CartState, AppError> {
        self.cart
            .dispatch(CartAction::ClearCart)
            .map_err(|e| self.reject(e.into()))
    }

    // ========== Event loop ==========

    /// Load the first page, then apply settled search terms until shutdown
    pub async fn run(
        self: Arc<Self>,
        mut searches: mpsc::UnboundedReceiver<String>,
        shutdown: CancellationToken,
    ) {
        tracing::info!(catalog = %self.kind, "Catalog page started");
        self.refresh();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                term = searches.recv() => match term {
                    Some(term) => {
                        self.set_search_term(&term);
                    }
                    None => {
                        // Search input gone; keep serving until shutdown
                        shutdown.cancelled().await;
                        break;
                    }
                },
            }
        }

        tracing::info!(catalog = %self.kind, "Catalog page stopped");
    }
}

/// The three catalog pages sharing one cart
pub struct Storefront {
    pub men: Arc<PageController>,
    pub women: Arc<PageController>,
    pub electronics: Arc<PageController>,
    pub cart: Arc<CartStore>,
}

impl Storefront {
    pub fn new(
        config: &StorefrontConfig,
        source: Arc<dyn CatalogSource>,
        collaborators: &Collaborators,
    ) -> Self {
        let cart = Arc::new(CartStore::new());
        let page = |kind| {
            Arc::new(PageController::new(
                kind,
                config,
                source.clone(),
                cart.clone(),
                collaborators,
            ))
        };
        Self {
            men: page(CatalogKind::Men),
            women: page(CatalogKind::Women),
            electronics: page(CatalogKind::Electronics),
            cart: cart.clone(),
        }
    }

    pub fn page(&self, kind: CatalogKind) -> &Arc<PageController> {
        match kind {
            CatalogKind::Men => &self.men,
            CatalogKind::Women => &self.women,
            CatalogKind::Electronics => &self.electronics,
        }
    }
}
