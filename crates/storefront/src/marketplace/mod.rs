//! EcomGo marketplace REST API client.
//!
//! # Architecture
//!
//! - JSON over HTTP via `reqwest`; the marketplace is the source of truth
//! - Product details and the top-rated list are cached via `moka` (5 minute TTL)
//! - Credentials travel in the request body, as the API requires
//!
//! # Error payloads
//!
//! The API reports failures by returning a bare JSON string where an object
//! or array was expected. [`ApiPayload`] decodes that once, at this boundary,
//! and the client surfaces it as [`MarketplaceError::Rejected`]. Nothing
//! above this module inspects response shapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use ecomgo_storefront::marketplace::MarketplaceClient;
//!
//! let client = MarketplaceClient::new(&config.marketplace)?;
//!
//! let products = client.search_products("lamp").await?;
//! let product = client.get_product(products[0].product_id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::MarketplaceClient;
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API answered with a message instead of the expected data.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Response body was not valid JSON of the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MarketplaceError {
    /// Whether the API said the thing asked for does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Rejected(_))
    }

    /// Whether the API refused the request itself, as opposed to failing.
    ///
    /// True for message payloads, 404s and other 4xx statuses.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::Rejected(_) => true,
            Self::Api { status, .. } => *status >= 400 && *status < 500,
            _ => false,
        }
    }
}

/// A marketplace response body: the expected data, or a message string.
///
/// `Message` is tried first, so a bare JSON string is always read as a
/// message even when `T` could accept one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiPayload<T> {
    Message(String),
    Data(T),
}

impl<T> ApiPayload<T> {
    /// Convert into a result, a message becoming [`MarketplaceError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for a message payload.
    pub fn into_result(self) -> Result<T, MarketplaceError> {
        match self {
            Self::Data(data) => Ok(data),
            Self::Message(message) => Err(MarketplaceError::Rejected(message)),
        }
    }
}
