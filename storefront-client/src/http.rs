//! Catalog listing over HTTP

use crate::config::StorefrontConfig;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use shared::catalog::{CatalogKind, CatalogPage, CatalogQuery, QueryError};

/// Where listing pages come from
///
/// The fetcher only sees this trait; tests plug in fakes whose responses
/// resolve in whatever order they need.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list(&self, kind: CatalogKind, query: &CatalogQuery) -> ClientResult<CatalogPage>;
}

/// Catalog source backed by the remote listing service
#[derive(Debug, Clone)]
pub struct NetworkCatalogClient {
    client: Client,
    base_url: String,
}

impl NetworkCatalogClient {
    pub fn new(config: &StorefrontConfig) -> ClientResult<Self> {
        // The fetcher enforces its own deadline; this one only guards
        // against sockets that never close.
        let client = Client::builder()
            .timeout(config.request_timeout() * 2)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Listing URL for a catalog, without query parameters
    pub fn endpoint(&self, kind: CatalogKind) -> String {
        format!("{}/{}", self.base_url, kind.path())
    }

    async fn handle_response(
        &self,
        kind: CatalogKind,
        query: &CatalogQuery,
        response: reqwest::Response,
    ) -> ClientResult<CatalogPage> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: Value = response.json().await?;
        Ok(CatalogPage::from_response(kind, query, body)?)
    }
}

#[async_trait]
impl CatalogSource for NetworkCatalogClient {
    async fn list(&self, kind: CatalogKind, query: &CatalogQuery) -> ClientResult<CatalogPage> {
        let url = self.endpoint(kind);
        tracing::debug!(%url, page = query.page(), "GET catalog listing");
        let response = self
            .client
            .get(&url)
            .query(&query.to_params())
            .send()
            .await?;
        self.handle_response(kind, query, response).await
    }
}

// ========== URL boundary ==========

/// Encode a query as a URL query string (`page=1&limit=20&...`)
pub fn to_query_string(query: &CatalogQuery) -> String {
    Url::parse_with_params(PLACEHOLDER_BASE, query.to_params())
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default()
}

/// Decode a URL query string; missing keys take their defaults
pub fn from_query_string(raw: &str) -> Result<CatalogQuery, QueryError> {
    let raw = raw.trim_start_matches('?');
    let url = Url::parse(&format!("{PLACEHOLDER_BASE}?{raw}"))
        .map_err(|_| QueryError::invalid_param("query", raw))?;
    CatalogQuery::from_params(url.query_pairs().into_owned())
}

/// Only the query component of this URL is ever read
const PLACEHOLDER_BASE: &str = "http://localhost/";
