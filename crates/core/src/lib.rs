//! EcomGo Core - Shared marketplace types.
//!
//! This crate provides the types and the pure view-state logic used by the
//! EcomGo storefront:
//! - Products, accounts, users and reviews as returned by the marketplace API
//! - Discount pricing shared by every surface that shows a price
//! - Cart membership, catalog query resolution, pagination and sentiment tallies
//!
//! # Architecture
//!
//! The core crate contains only types and derivation logic - no I/O, no HTTP
//! clients. Everything here is a function of its inputs, which keeps it
//! lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, credentials and
//!   the marketplace entities
//! - [`catalog`] - Decides how a catalog listing is fetched and filtered
//! - [`pagination`] - Page count and visible slice for list pages
//! - [`review`] - Sentiment counts and tab filtering for product reviews

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod pagination;
pub mod review;
pub mod types;

pub use catalog::{CatalogQuery, CatalogSource};
pub use pagination::{Pagination, ReloadFactors};
pub use review::{Review, SentimentCounts};
pub use types::*;
