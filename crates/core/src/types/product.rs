//! Marketplace product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product listed on the marketplace.
///
/// Products are immutable once fetched; pages hold their own copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// File name under the API's `product_images/` directory.
    #[serde(default)]
    pub image_file: String,
    /// List price in dollars.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Fractional discount in `[0, 1]`.
    #[serde(with = "rust_decimal::serde::float", default)]
    pub discount: Decimal,
    /// Username of the seller.
    pub owner: String,
    pub category: String,
}

impl Product {
    /// The list price, rounded to cents.
    #[must_use]
    pub fn list_price(&self) -> Price {
        Price::new(self.price)
    }

    /// The price after discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        Price::discounted(self.price, self.discount)
    }

    /// Whether a non-zero discount applies.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        !self.discount.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build a product for tests.
    pub(crate) fn product(id: i64, category: &str) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            image_file: format!("{id}.png"),
            price: Decimal::new(1000, 2),
            discount: Decimal::ZERO,
            owner: "seller".to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_deserialize_from_api_json() {
        let json = r#"{
            "product_id": 7,
            "name": "Desk Lamp",
            "description": "Warm light",
            "image_file": "lamp.png",
            "price": 24.99,
            "discount": 0.2,
            "owner": "lumen&co",
            "category": "furniture"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, ProductId::new(7));
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert!(product.is_discounted());
        assert_eq!(product.discounted_price().to_string(), "$19.99");
        assert_eq!(product.list_price().to_string(), "$24.99");
    }

    #[test]
    fn test_missing_discount_defaults_to_zero() {
        let json = r#"{"product_id":1,"name":"x","price":3,"owner":"o","category":"clothes"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(!product.is_discounted());
        assert_eq!(product.discounted_price(), product.list_price());
    }
}
