//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storefront_client::{
    Analytics, AnalyticsEvent, AppError, CatalogKind, CatalogPage, CatalogQuery, CatalogSource,
    ClientError, ClientResult, Collaborators, ErrorReporter, FetchState, Notification, Notifier,
    PageController, Product,
};
use tokio::sync::oneshot;

pub fn product(id: &str, title: &str, original: f64, discounted: f64) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        price_original: original,
        price_discounted: discounted,
        visible: true,
        availability_note: None,
        image_ref: format!("https://img.test/{id}.jpg"),
    }
}

pub fn page_of(ids: &[&str], total_pages: u32) -> CatalogPage {
    CatalogPage {
        items: ids
            .iter()
            .map(|id| product(id, &format!("Product {id}"), 30.0, 25.0))
            .collect(),
        total_pages,
        total: None,
        skipped: 0,
    }
}

type Gate = oneshot::Receiver<ClientResult<CatalogPage>>;

/// Catalog source whose responses the test releases by hand
///
/// Requests whose search term has a gate wait for it; all others answer
/// at once with a three-page listing.
#[derive(Default)]
pub struct FakeSource {
    calls: Mutex<Vec<(CatalogKind, CatalogQuery)>>,
    gates: Mutex<HashMap<String, Gate>>,
    finished: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold requests searching for `term` until the sender fires
    pub fn hold(&self, term: &str) -> oneshot::Sender<ClientResult<CatalogPage>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(term.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<CatalogQuery> {
        self.calls.lock().iter().map(|(_, q)| q.clone()).collect()
    }

    pub fn kinds(&self) -> Vec<CatalogKind> {
        self.calls.lock().iter().map(|(k, _)| *k).collect()
    }

    /// Requests that have produced a response
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn list(&self, kind: CatalogKind, query: &CatalogQuery) -> ClientResult<CatalogPage> {
        self.calls.lock().push((kind, query.clone()));
        let gate = self.gates.lock().remove(query.search_term());
        let response = match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(ClientError::InvalidResponse("gate dropped".into()))),
            None => Ok(page_of(&["p1", "p2", "p3"], 3)),
        };
        self.finished.fetch_add(1, Ordering::SeqCst);
        response
    }
}

/// Records every side effect a page controller produces
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<AnalyticsEvent>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub reports: Mutex<Vec<AppError>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            analytics: self.clone(),
            notifier: self.clone(),
            reporter: self.clone(),
        }
    }

    pub fn notification_titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl Analytics for Recorder {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

impl ErrorReporter for Recorder {
    fn report(&self, _context: &str, error: &AppError) {
        self.reports.lock().push(error.clone());
    }
}

/// Wait until the page has settled request `seq` (success or error)
pub async fn settled(page: &PageController, seq: u64) -> FetchState {
    let mut rx = page.subscribe_fetch();
    let state = rx
        .wait_for(|s| s.request_seq() == Some(seq) && !s.is_loading())
        .await
        .expect("fetch state channel closed");
    state.clone()
}
