//! Catalog resolution against the marketplace.
//!
//! Fetches the listing a [`CatalogQuery`] asks for and applies its category
//! filter. When a fetch fails the visitor keeps what they were looking at:
//! the listing of the query they were last shown, else the last listing of
//! the requested query, else nothing. The failure is logged, not shown.

use std::sync::Arc;
use std::time::Duration;

use ecomgo_core::{CatalogQuery, CatalogSource, Product};
use moka::future::Cache;
use tracing::{instrument, warn};

use crate::marketplace::{MarketplaceClient, MarketplaceError};

/// How long a resolved listing is kept for stale fallback.
const STALE_LISTING_TTL: Duration = Duration::from_secs(60 * 60);

/// A resolved catalog listing.
#[derive(Debug, Clone)]
pub struct CatalogListing {
    pub products: Arc<Vec<Product>>,
    /// Set when the fetch failed and an older listing is shown.
    pub stale: bool,
}

/// Resolves catalog queries, remembering the last good listing per query.
#[derive(Clone)]
pub struct CatalogService {
    client: MarketplaceClient,
    last_good: Cache<CatalogQuery, Arc<Vec<Product>>>,
}

impl CatalogService {
    #[must_use]
    pub fn new(client: MarketplaceClient) -> Self {
        let last_good = Cache::builder()
            .max_capacity(500)
            .time_to_live(STALE_LISTING_TTL)
            .build();

        Self { client, last_good }
    }

    /// Resolve a query to the products to display.
    ///
    /// `shown` is the query whose listing the visitor currently has on
    /// screen, if any.
    #[instrument(
        skip(self, shown),
        fields(category = %query.category(), search_query = %query.search_query())
    )]
    pub async fn resolve(
        &self,
        query: &CatalogQuery,
        shown: Option<&CatalogQuery>,
    ) -> CatalogListing {
        match self.fetch(query).await {
            Ok(fetched) => {
                let products = Arc::new(query.resolve(fetched));
                self.last_good
                    .insert(query.clone(), Arc::clone(&products))
                    .await;
                CatalogListing {
                    products,
                    stale: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, serving last listing");
                let previous = match shown {
                    Some(shown) => self.last_good.get(shown).await,
                    None => None,
                };
                let products = match previous {
                    Some(products) => products,
                    None => self.last_good.get(query).await.unwrap_or_default(),
                };
                CatalogListing {
                    products,
                    stale: true,
                }
            }
        }
    }

    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Product>, MarketplaceError> {
        match query.source() {
            CatalogSource::AllProducts => self.client.get_all_products().await,
            CatalogSource::Search(text) => self.client.search_products(text).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MarketplaceConfig;
    use ecomgo_core::{Category, CategoryFilter};
    use mockito::Matcher;
    use url::Url;

    fn products_json() -> String {
        serde_json::json!([
            {"product_id": 1, "name": "Phone", "price": 300.0, "owner": "a", "category": "electronics"},
            {"product_id": 2, "name": "Shirt", "price": 20.0, "owner": "b", "category": "Clothes"},
            {"product_id": 3, "name": "Laptop", "price": 900.0, "owner": "a", "category": "ELECTRONICS"}
        ])
        .to_string()
    }

    fn service(server: &mockito::ServerGuard) -> CatalogService {
        let url = Url::parse(&format!("{}/", server.url())).unwrap();
        CatalogService::new(MarketplaceClient::new(&MarketplaceConfig::new(url)).unwrap())
    }

    fn ids(listing: &CatalogListing) -> Vec<i64> {
        listing.products.iter().map(|p| p.product_id.get()).collect()
    }

    #[tokio::test]
    async fn test_category_only_lists_all_then_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get_all_products")
            .with_status(200)
            .with_body(products_json())
            .expect(1)
            .create_async()
            .await;

        let query = CatalogQuery::new(CategoryFilter::Only(Category::Electronics), "");
        let listing = service(&server).resolve(&query, None).await;
        assert!(!listing.stale);
        assert_eq!(ids(&listing), [1, 3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_uses_search_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let all = server
            .mock("GET", "/get_all_products")
            .expect(0)
            .create_async()
            .await;
        let search = server
            .mock("GET", "/search_products")
            .match_query(Matcher::UrlEncoded("search_query".into(), "laptop".into()))
            .with_status(200)
            .with_body(products_json())
            .expect(1)
            .create_async()
            .await;

        let query = CatalogQuery::new(CategoryFilter::All, "laptop");
        let listing = service(&server).resolve(&query, None).await;
        assert_eq!(ids(&listing), [1, 2, 3]);
        all.assert_async().await;
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_failure_serves_last_listing() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/get_all_products")
            .with_status(200)
            .with_body(products_json())
            .expect(1)
            .create_async()
            .await;

        let service = service(&server);
        let query = CatalogQuery::default();
        let first = service.resolve(&query, None).await;
        ok.assert_async().await;
        ok.remove_async().await;

        server
            .mock("GET", "/get_all_products")
            .with_status(500)
            .create_async()
            .await;

        let second = service.resolve(&query, Some(&query)).await;
        assert!(second.stale);
        assert_eq!(ids(&second), ids(&first));
    }

    #[tokio::test]
    async fn test_failure_without_history_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_all_products")
            .with_status(503)
            .create_async()
            .await;

        let listing = service(&server).resolve(&CatalogQuery::default(), None).await;
        assert!(listing.stale);
        assert!(listing.products.is_empty());
    }

    #[tokio::test]
    async fn test_failed_new_query_keeps_shown_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_all_products")
            .with_status(200)
            .with_body(products_json())
            .create_async()
            .await;
        server
            .mock("GET", "/search_products")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let service = service(&server);
        let shown = CatalogQuery::new(CategoryFilter::Only(Category::Electronics), "");
        let first = service.resolve(&shown, None).await;

        let search = CatalogQuery::new(CategoryFilter::All, "desk");
        let second = service.resolve(&search, Some(&shown)).await;
        assert!(second.stale);
        assert_eq!(ids(&second), ids(&first));

        // Nothing on screen and no history for the query: empty.
        let third = service.resolve(&search, None).await;
        assert!(third.stale);
        assert!(third.products.is_empty());
    }
}
