//! Storefront client - catalog browsing and cart session
//!
//! Keeps each catalog page's listing in sync with its filter/sort/page/search
//! query and holds the shopper's cart for the session.
//!
//! - [`QueryStateController`]: validated query state per page
//! - [`DebouncedSearchInput`]: turns keystrokes into settled search terms
//! - [`CatalogFetcher`]: listing requests guarded against stale responses
//! - [`CartStore`]: published cart state around the pure reducer
//! - [`PageController`] / [`Storefront`]: the men, women and electronics pages

pub mod cart_store;
pub mod collaborators;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logger;
pub mod page;
pub mod query_state;

pub use cart_store::CartStore;
pub use collaborators::{
    Analytics, AnalyticsEvent, ErrorReporter, LogSink, Notification, NotificationLevel, Notifier,
};
pub use config::StorefrontConfig;
pub use debounce::DebouncedSearchInput;
pub use error::{ClientError, ClientResult};
pub use fetcher::{CatalogFetcher, FetchState};
pub use http::{CatalogSource, NetworkCatalogClient, from_query_string, to_query_string};
pub use page::{Collaborators, PageController, Storefront};
pub use query_state::QueryStateController;

// Re-export shared types for convenience
pub use shared::{
    AppError, CartAction, CartError, CartState, CartSummary, CatalogKind, CatalogPage,
    CatalogQuery, ErrorCode, Product, QueryError, SortOrder,
};
