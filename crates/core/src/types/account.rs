//! The logged-in visitor's account.

use serde::{Deserialize, Serialize};

use super::{Cart, Credentials, ProductId};

/// A logged-in account: credentials, bio and cart.
///
/// An account is replaced wholesale on every change (login, bio edit, cart
/// update); the `with_*` methods return the replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub credentials: Credentials,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub cart: Cart,
}

impl Account {
    /// Create an account with an empty bio and cart.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            bio: String::new(),
            cart: Cart::new(),
        }
    }

    /// The account's username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// The bio, if one was written.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        Some(self.bio.trim()).filter(|b| !b.is_empty())
    }

    /// This account with a new bio.
    #[must_use]
    pub fn with_bio(self, bio: impl Into<String>) -> Self {
        Self {
            bio: bio.into(),
            ..self
        }
    }

    /// This account with a new cart.
    #[must_use]
    pub fn with_cart(self, cart: Cart) -> Self {
        Self { cart, ..self }
    }
}

/// Whether a visitor's cart holds the product.
///
/// False for anonymous visitors; otherwise true iff the cart contains exactly
/// one product with this id.
#[must_use]
pub fn is_in_cart(product_id: ProductId, account: Option<&Account>) -> bool {
    account.is_some_and(|account| account.cart.contains(product_id))
}
