//! Core types for EcomGo.
//!
//! This module provides type-safe wrappers for the marketplace's domain
//! concepts.

pub mod account;
pub mod cart;
pub mod category;
pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod sentiment;
pub mod user;

pub use account::{Account, is_in_cart};
pub use cart::Cart;
pub use category::{Category, CategoryError, CategoryFilter};
pub use credential::{Credentials, CredentialsError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, discounted_price};
pub use product::Product;
pub use sentiment::{Sentiment, SentimentError, SentimentTab};
pub use user::User;
