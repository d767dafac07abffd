//! Catalog fetcher with stale-response protection
//!
//! Every fetch takes the next request sequence number. A completion is
//! published only while its number is still the newest one issued, so a
//! slow response for an old query can never overwrite the listing of a
//! newer one. Superseded requests are not cancelled; they finish and are
//! dropped.

use crate::ClientError;
use crate::collaborators::ErrorReporter;
use crate::http::CatalogSource;
use parking_lot::Mutex;
use serde::Serialize;
use shared::catalog::{CatalogKind, CatalogQuery};
use shared::error::AppError;
use shared::models::Product;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Observable state of a catalog listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FetchState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Loading { request_seq: u64 },
    #[serde(rename_all = "camelCase")]
    Success {
        request_seq: u64,
        items: Vec<Product>,
        total_pages: u32,
    },
    #[serde(rename_all = "camelCase")]
    Error { request_seq: u64, message: String },
}

impl FetchState {
    /// Sequence number of the request this state belongs to
    pub fn request_seq(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Loading { request_seq }
            | Self::Success { request_seq, .. }
            | Self::Error { request_seq, .. } => Some(*request_seq),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Fetched products; empty unless the last fetch succeeded
    pub fn items(&self) -> &[Product] {
        match self {
            Self::Success { items, .. } => items,
            _ => &[],
        }
    }

    /// Products that should be rendered (hidden ones filtered out)
    pub fn visible_items(&self) -> impl Iterator<Item = &Product> {
        self.items().iter().filter(|p| p.visible)
    }

    pub fn total_pages(&self) -> Option<u32> {
        match self {
            Self::Success { total_pages, .. } => Some(*total_pages),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Issues listing requests for one catalog and publishes the newest result
pub struct CatalogFetcher {
    kind: CatalogKind,
    source: Arc<dyn CatalogSource>,
    reporter: Arc<dyn ErrorReporter>,
    timeout: Duration,
    /// Highest sequence number issued; held while checking and publishing,
    /// never while calling the reporter
    latest_seq: Mutex<u64>,
    state_tx: watch::Sender<FetchState>,
}

impl CatalogFetcher {
    pub fn new(
        kind: CatalogKind,
        source: Arc<dyn CatalogSource>,
        reporter: Arc<dyn ErrorReporter>,
        timeout: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(FetchState::Idle);
        Self {
            kind,
            source,
            reporter,
            timeout,
            latest_seq: Mutex::new(0),
            state_tx,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the published state
    pub fn state(&self) -> FetchState {
        self.state_tx.borrow().clone()
    }

    /// Highest request sequence number issued so far
    pub fn latest_seq(&self) -> u64 {
        *self.latest_seq.lock()
    }

    /// Fetch the listing for `query`
    ///
    /// Returns the state this request published, or `None` when a newer
    /// request was issued before it completed and its result was dropped.
    pub async fn fetch(&self, query: &CatalogQuery) -> Option<FetchState> {
        let request_seq = self.begin();
        self.complete(request_seq, query).await
    }

    /// Issue the next sequence number and publish `Loading` for it
    ///
    /// Callers that run the request on another task take the number here,
    /// at the point the query is issued, so the order tasks start in
    /// cannot reorder requests.
    pub fn begin(&self) -> u64 {
        let mut latest = self.latest_seq.lock();
        *latest += 1;
        self.state_tx.send_replace(FetchState::Loading {
            request_seq: *latest,
        });
        *latest
    }

    /// Run the request numbered `request_seq` by [`Self::begin`]
    pub async fn complete(&self, request_seq: u64, query: &CatalogQuery) -> Option<FetchState> {
        tracing::debug!(catalog = %self.kind, request_seq, page = query.page(), "Fetching catalog");

        let result = match tokio::time::timeout(self.timeout, self.source.list(self.kind, query)).await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        };

        let (next, failure) = match result {
            Ok(page) => (
                FetchState::Success {
                    request_seq,
                    items: page.items,
                    total_pages: page.total_pages,
                },
                None,
            ),
            Err(err) => {
                let err = AppError::from(err);
                let next = FetchState::Error {
                    request_seq,
                    message: err.message.clone(),
                };
                (next, Some(err))
            }
        };

        {
            let latest = self.latest_seq.lock();
            if *latest != request_seq {
                tracing::debug!(
                    catalog = %self.kind,
                    request_seq,
                    latest = *latest,
                    "Discarding stale catalog response"
                );
                return None;
            }
            self.state_tx.send_replace(next.clone());
        }

        match &failure {
            Some(err) => {
                tracing::error!(catalog = %self.kind, request_seq, code = %err.code, "Catalog fetch failed: {}", err.message);
                self.reporter.report(self.kind.path(), err);
            }
            None => tracing::info!(
                catalog = %self.kind,
                request_seq,
                items = next.items().len(),
                total_pages = next.total_pages().unwrap_or_default(),
                "Catalog page loaded"
            ),
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientResult;
    use async_trait::async_trait;
    use shared::catalog::CatalogPage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn product(id: &str, visible: bool) -> Product {
        Product {
            id: id.to_string(),
            title: id.to_string(),
            price_original: 10.0,
            price_discounted: 10.0,
            visible,
            availability_note: None,
            image_ref: String::new(),
        }
    }

    struct FixedSource(Vec<Product>);

    #[async_trait]
    impl CatalogSource for FixedSource {
        async fn list(&self, _kind: CatalogKind, _query: &CatalogQuery) -> ClientResult<CatalogPage> {
            Ok(CatalogPage {
                items: self.0.clone(),
                total_pages: 4,
                total: None,
                skipped: 0,
            })
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CatalogSource for FailingSource {
        async fn list(&self, _kind: CatalogKind, _query: &CatalogQuery) -> ClientResult<CatalogPage> {
            Err(ClientError::Status {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    struct HangingSource;

    #[async_trait]
    impl CatalogSource for HangingSource {
        async fn list(&self, _kind: CatalogKind, _query: &CatalogQuery) -> ClientResult<CatalogPage> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct CountingReporter(AtomicUsize);

    impl ErrorReporter for CountingReporter {
        fn report(&self, _context: &str, _error: &AppError) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fetcher(source: impl CatalogSource + 'static, reporter: Arc<CountingReporter>) -> CatalogFetcher {
        CatalogFetcher::new(
            CatalogKind::Electronics,
            Arc::new(source),
            reporter,
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn test_success_publishes_items() {
        let reporter = Arc::new(CountingReporter::default());
        let fetcher = fetcher(
            FixedSource(vec![product("a", true), product("b", false)]),
            reporter.clone(),
        );
        assert_eq!(fetcher.state(), FetchState::Idle);

        let state = fetcher.fetch(&CatalogQuery::default()).await.unwrap();
        assert_eq!(state.request_seq(), Some(1));
        assert_eq!(state.total_pages(), Some(4));
        assert_eq!(state.items().len(), 2);
        let visible: Vec<_> = state.visible_items().map(|p| p.id.as_str()).collect();
        assert_eq!(visible, vec!["a"]);
        assert_eq!(fetcher.state(), state);
        assert_eq!(reporter.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_clears_items_and_reports() {
        let reporter = Arc::new(CountingReporter::default());
        let fetcher = fetcher(FailingSource, reporter.clone());

        let state = fetcher.fetch(&CatalogQuery::default()).await.unwrap();
        assert!(state.items().is_empty());
        assert!(state.error_message().unwrap().contains("500"));
        assert_eq!(reporter.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_error() {
        let reporter = Arc::new(CountingReporter::default());
        let fetcher = fetcher(HangingSource, reporter.clone());

        let state = fetcher.fetch(&CatalogQuery::default()).await.unwrap();
        assert!(matches!(state, FetchState::Error { request_seq: 1, .. }));
        assert!(state.error_message().unwrap().contains("timed out"));
        assert_eq!(reporter.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequence_increases() {
        let fetcher = fetcher(FixedSource(vec![]), Arc::new(CountingReporter::default()));
        for expected in 1..=3 {
            let state = fetcher.fetch(&CatalogQuery::default()).await.unwrap();
            assert_eq!(state.request_seq(), Some(expected));
        }
        assert_eq!(fetcher.latest_seq(), 3);
    }

    #[tokio::test]
    async fn test_numbers_follow_issue_order() {
        let fetcher = fetcher(FixedSource(vec![]), Arc::new(CountingReporter::default()));
        let query = CatalogQuery::default();

        let first = fetcher.begin();
        let second = fetcher.begin();
        assert_eq!(fetcher.state(), FetchState::Loading { request_seq: 2 });

        // the newer request completes first, the older one is dropped
        let state = fetcher.complete(second, &query).await.unwrap();
        assert_eq!(state.request_seq(), Some(2));
        assert_eq!(fetcher.complete(first, &query).await, None);
        assert_eq!(fetcher.state(), state);
    }

    /// Reads the fetcher back from inside `report`
    #[derive(Default)]
    struct ReentrantReporter {
        fetcher: parking_lot::Mutex<std::sync::Weak<CatalogFetcher>>,
        seen: parking_lot::Mutex<Vec<(u64, Option<u64>)>>,
    }

    impl ErrorReporter for ReentrantReporter {
        fn report(&self, _context: &str, _error: &AppError) {
            if let Some(fetcher) = self.fetcher.lock().upgrade() {
                self.seen
                    .lock()
                    .push((fetcher.latest_seq(), fetcher.state().request_seq()));
            }
        }
    }

    #[tokio::test]
    async fn test_reporter_may_read_fetcher() {
        let reporter = Arc::new(ReentrantReporter::default());
        let fetcher = Arc::new(CatalogFetcher::new(
            CatalogKind::Men,
            Arc::new(FailingSource),
            reporter.clone(),
            Duration::from_secs(10),
        ));
        *reporter.fetcher.lock() = Arc::downgrade(&fetcher);

        let state = fetcher.fetch(&CatalogQuery::default()).await.unwrap();
        assert!(state.error_message().is_some());
        // the error state is already published when the reporter runs
        assert_eq!(*reporter.seen.lock(), vec![(1, Some(1))]);
    }
}
