//! Application state shared across handlers.

use std::sync::Arc;

use ecomgo_core::Product;
use thiserror::Error;
use tracing::warn;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::marketplace::{MarketplaceClient, MarketplaceError};
use crate::services::CatalogService;

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("marketplace client: {0}")]
    Marketplace(#[from] MarketplaceError),
    #[error("content: {0}")]
    Content(#[from] serde_json::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the marketplace client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    marketplace: MarketplaceClient,
    catalog: CatalogService,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the embedded
    /// content is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let marketplace = MarketplaceClient::new(&config.marketplace)?;
        let catalog = CatalogService::new(marketplace.clone());
        let content = ContentStore::load()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                marketplace,
                catalog,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace API client.
    #[must_use]
    pub fn marketplace(&self) -> &MarketplaceClient {
        &self.inner.marketplace
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the static content.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// The "Top Rated" strip shared by every page that shows it.
    ///
    /// Empty when the marketplace cannot be reached.
    pub async fn top_rated(&self) -> Vec<Product> {
        self.marketplace()
            .get_most_rated_products(self.config().top_rated_count)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load top rated products");
                Vec::new()
            })
    }
}
