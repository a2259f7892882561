//! Public marketplace user profile.

use serde::{Deserialize, Serialize};

use super::Product;

/// A marketplace user as shown in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub owned_products: Vec<Product>,
}

impl User {
    /// The bio, if one was written.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}
