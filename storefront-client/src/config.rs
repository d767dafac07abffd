//! Client configuration

use std::time::Duration;

/// Default catalog service
pub const DEFAULT_BASE_URL: &str = "https://e-shop-215k.onrender.com";
/// Default bound on one listing request
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default quiescence window for search input
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 2_000;

/// Storefront client configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_BASE_URL | https://e-shop-215k.onrender.com | Catalog listing service |
/// | REQUEST_TIMEOUT_MS | 10000 | Bound on one listing request |
/// | SEARCH_DEBOUNCE_MS | 2000 | Search input quiescence window |
/// | LOG_LEVEL | info | Default log level (RUST_LOG wins) |
/// | LOG_DIR | unset | Write daily-rolling log files here |
///
/// # Example
///
/// ```ignore
/// CATALOG_BASE_URL=http://localhost:4000 SEARCH_DEBOUNCE_MS=300 cargo run --example browse
/// ```
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog service base URL, without trailing slash
    pub base_url: String,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Search debounce window (milliseconds)
    pub search_debounce_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl StorefrontConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            search_debounce_ms: std::env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// Configuration with built-in defaults only, ignoring the environment
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce_ms = window.as_millis() as u64;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
