//! Marketplace API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Caches product details and the top-rated
//! list using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use ecomgo_core::{Cart, Credentials, Product, ProductId, Review, ReviewIndex, User};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::types::{AccountRecord, ChatMessage, ChatRequest, EditBioRequest};
use super::{ApiPayload, MarketplaceError};
use crate::config::MarketplaceConfig;

// =============================================================================
// MarketplaceClient
// =============================================================================

/// Client for the EcomGo marketplace REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl MarketplaceClient {
    /// Create a new marketplace API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    /// URL of a product image served by the API.
    #[must_use]
    pub fn image_url(&self, image_file: &str) -> String {
        format!(
            "{}product_images/{}",
            self.inner.base_url,
            urlencoding::encode(image_file)
        )
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder, MarketplaceError> {
        let url = self.inner.base_url.join(endpoint)?;
        let builder = self.inner.client.request(method, url);
        Ok(if query.is_empty() {
            builder
        } else {
            builder.query(query)
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketplaceError> {
        let request = self.request(Method::GET, endpoint, query)?;
        self.execute(endpoint, request).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, MarketplaceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(method, endpoint, query)?.json(body);
        self.execute(endpoint, request).await
    }

    /// Send a request and decode its payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, MarketplaceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(MarketplaceError::NotFound(endpoint.to_string()));
        }
        if !status.is_success() {
            return Err(MarketplaceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: ApiPayload<T> = serde_json::from_str(&body)?;
        if let ApiPayload::Message(message) = &payload {
            debug!(endpoint, message = %message, "Marketplace rejected request");
        }
        payload.into_result()
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Every product, unranked.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<Product>, MarketplaceError> {
        self.get("get_all_products", &[]).await
    }

    /// Products matching a search query, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, MarketplaceError> {
        self.get("search_products", &[("search_query", query.to_string())])
            .await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` or `NotFound` if there is no such product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, MarketplaceError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get("get_product_using_id", &[("product_id", id.to_string())])
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// The `k` most-rated products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_most_rated_products(&self, k: usize) -> Result<Vec<Product>, MarketplaceError> {
        let key = CacheKey::MostRated(k);
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for most rated products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .get("get_most_rated_products", &[("k", k.to_string())])
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Up to `k` products recommended for a user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_recommended_products(
        &self,
        username: &str,
        k: usize,
    ) -> Result<Vec<Product>, MarketplaceError> {
        self.get(
            "get_recommended_products",
            &[("username", username.to_string()), ("k", k.to_string())],
        )
        .await
    }

    // =========================================================================
    // Reviews & Ratings
    // =========================================================================

    /// Reviews of a product, in list order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_reviews(&self, id: ProductId) -> Result<Vec<Review>, MarketplaceError> {
        self.get("get_reviews_of_product", &[("product_id", id.to_string())])
            .await
    }

    /// Add a review.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials, review), fields(product_id = %id))]
    pub async fn add_review(
        &self,
        credentials: &Credentials,
        id: ProductId,
        review: &str,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::PATCH,
            "add_product_review",
            &[("product_id", id.to_string()), ("review", review.to_string())],
            credentials,
        )
        .await
        .map(drop)
    }

    /// Replace the text of the review at `index`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials, new_review), fields(product_id = %id, review_idx = %index))]
    pub async fn update_review(
        &self,
        credentials: &Credentials,
        id: ProductId,
        index: ReviewIndex,
        new_review: &str,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::PATCH,
            "update_product_review",
            &[
                ("product_id", id.to_string()),
                ("review_idx", index.to_string()),
                ("new_review", new_review.to_string()),
            ],
            credentials,
        )
        .await
        .map(drop)
    }

    /// Delete the review at `index`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(product_id = %id, review_idx = %index))]
    pub async fn remove_review(
        &self,
        credentials: &Credentials,
        id: ProductId,
        index: ReviewIndex,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::DELETE,
            "remove_product_review",
            &[
                ("product_id", id.to_string()),
                ("review_idx", index.to_string()),
            ],
            credentials,
        )
        .await
        .map(drop)
    }

    /// Rate a product.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(product_id = %id))]
    pub async fn rate_product(
        &self,
        credentials: &Credentials,
        id: ProductId,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::PATCH,
            "rate_product",
            &[("product_id", id.to_string())],
            credentials,
        )
        .await?;
        self.inner.cache.invalidate_all();
        Ok(())
    }

    /// Withdraw a rating.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(product_id = %id))]
    pub async fn unrate_product(
        &self,
        credentials: &Credentials,
        id: ProductId,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::PATCH,
            "unrate_product",
            &[("product_id", id.to_string())],
            credentials,
        )
        .await?;
        self.inner.cache.invalidate_all();
        Ok(())
    }

    /// Usernames of everyone who rated a product.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_raters(&self, id: ProductId) -> Result<Vec<String>, MarketplaceError> {
        self.get("get_raters_of_product", &[("product_id", id.to_string())])
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Every user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<User>, MarketplaceError> {
        self.get("get_all_users", &[]).await
    }

    /// Users matching a search query.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, MarketplaceError> {
        self.get("search_users", &[("search_query", query.to_string())])
            .await
    }

    /// Get a user's public profile.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` or `NotFound` if there is no such user.
    #[instrument(skip(self))]
    pub async fn get_user(&self, username: &str) -> Result<User, MarketplaceError> {
        self.get("get_user_info", &[("username", username.to_string())])
            .await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the username is taken.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountRecord, MarketplaceError> {
        self.send_account(Method::POST, "create_account", credentials)
            .await
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the credentials are wrong.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn log_in(
        &self,
        credentials: &Credentials,
    ) -> Result<AccountRecord, MarketplaceError> {
        self.send_account(Method::POST, "log_in_account", credentials)
            .await
    }

    // The API answers account calls with either the account or `true`.
    async fn send_account(
        &self,
        method: Method,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<AccountRecord, MarketplaceError> {
        let value: serde_json::Value = self.send(method, endpoint, &[], credentials).await?;
        if value.is_object() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(AccountRecord::default())
        }
    }

    /// Replace the account's bio.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials, new_bio), fields(username = %credentials.username()))]
    pub async fn edit_bio(
        &self,
        credentials: &Credentials,
        new_bio: &str,
    ) -> Result<(), MarketplaceError> {
        let body = EditBioRequest::new(credentials, new_bio);
        self.send::<IgnoredAny, _>(Method::PATCH, "edit_bio", &[], &body)
            .await
            .map(drop)
    }

    /// Delete the account.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn delete_account(&self, credentials: &Credentials) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(Method::DELETE, "delete_account", &[], credentials)
            .await
            .map(drop)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The account's cart as the API sees it.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn get_cart(&self, credentials: &Credentials) -> Result<Cart, MarketplaceError> {
        let products: Vec<Product> = self
            .send(Method::POST, "get_cart", &[], credentials)
            .await?;
        Ok(Cart::from(products))
    }

    /// Add a product to the account's cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(product_id = %id))]
    pub async fn add_to_cart(
        &self,
        credentials: &Credentials,
        id: ProductId,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::PATCH,
            "add_product_to_cart",
            &[("product_id", id.to_string())],
            credentials,
        )
        .await
        .map(drop)
    }

    /// Remove a product from the account's cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, credentials), fields(product_id = %id))]
    pub async fn remove_from_cart(
        &self,
        credentials: &Credentials,
        id: ProductId,
    ) -> Result<(), MarketplaceError> {
        self.send::<IgnoredAny, _>(
            Method::DELETE,
            "remove_product_from_cart",
            &[("product_id", id.to_string())],
            credentials,
        )
        .await
        .map(drop)
    }

    // =========================================================================
    // Chatbot
    // =========================================================================

    /// Ask the support chatbot.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, request), fields(sender = %request.sender))]
    pub async fn chat(&self, request: &ChatRequest<'_>) -> Result<ChatMessage, MarketplaceError> {
        self.send(Method::POST, "chatbot", &[], request).await
    }
}
