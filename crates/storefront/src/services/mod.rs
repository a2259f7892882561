//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Catalog listing with stale fallback
//! - `cart` - Cart updates with best-effort marketplace sync

pub mod cart;
pub mod catalog;

pub use catalog::{CatalogListing, CatalogService};
