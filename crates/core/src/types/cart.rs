//! Shopping cart.
//!
//! A cart is an ordered list of products in which each product id appears at
//! most once. Every operation returns a new cart; the session replaces its
//! cart wholesale.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// An ordered, duplicate-free list of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Whether the cart holds exactly one product with this id.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items
            .iter()
            .filter(|p| p.product_id == product_id)
            .count()
            == 1
    }

    /// A copy of this cart with `product` appended, unless already present.
    #[must_use]
    pub fn with_product(&self, product: &Product) -> Self {
        let mut items = self.items.clone();
        if !self.items.iter().any(|p| p.product_id == product.product_id) {
            items.push(product.clone());
        }
        Self { items }
    }

    /// A copy of this cart without the product with this id.
    #[must_use]
    pub fn without_product(&self, product_id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|p| p.product_id != product_id)
                .cloned()
                .collect(),
        }
    }

    /// Checkout total: the sum of every item's discounted price.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(Product::discounted_price).sum()
    }

    /// Number of products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.items.iter()
    }

    /// The products as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }
}

// Carts read from the API or the session are deduplicated, keeping the
// first occurrence of each product id.
impl From<Vec<Product>> for Cart {
    fn from(products: Vec<Product>) -> Self {
        let mut items: Vec<Product> = Vec::with_capacity(products.len());
        for product in products {
            if !items.iter().any(|p| p.product_id == product.product_id) {
                items.push(product);
            }
        }
        Self { items }
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = core::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::tests::product;
    use rust_decimal::Decimal;

    fn ids(cart: &Cart) -> Vec<i64> {
        cart.iter().map(|p| p.product_id.get()).collect()
    }

    #[test]
    fn test_add_is_idempotent() {
        let cart = Cart::new().with_product(&product(1, "clothes"));
        let again = cart.with_product(&product(1, "clothes"));
        assert_eq!(cart, again);
        assert_eq!(ids(&again), [1]);
    }

    #[test]
    fn test_add_preserves_order() {
        let cart = Cart::new()
            .with_product(&product(3, "clothes"))
            .with_product(&product(1, "clothes"))
            .with_product(&product(2, "clothes"));
        assert_eq!(ids(&cart), [3, 1, 2]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cart = Cart::new().with_product(&product(1, "clothes"));
        assert_eq!(cart.without_product(ProductId::new(9)), cart);
    }

    #[test]
    fn test_remove_present() {
        let cart = Cart::new()
            .with_product(&product(1, "clothes"))
            .with_product(&product(2, "clothes"));
        let cart = cart.without_product(ProductId::new(1));
        assert_eq!(ids(&cart), [2]);
        assert!(!cart.contains(ProductId::new(1)));
    }

    #[test]
    fn test_contains() {
        let cart = Cart::new().with_product(&product(5, "furniture"));
        assert!(cart.contains(ProductId::new(5)));
        assert!(!cart.contains(ProductId::new(6)));
    }

    #[test]
    fn test_from_vec_deduplicates() {
        let cart = Cart::from(vec![
            product(1, "clothes"),
            product(2, "clothes"),
            product(1, "clothes"),
        ]);
        assert_eq!(ids(&cart), [1, 2]);
        assert!(cart.contains(ProductId::new(1)));
    }

    #[test]
    fn test_total_uses_discounted_prices() {
        let mut discounted = product(1, "clothes");
        discounted.discount = Decimal::new(5, 1); // 50% off 10.00
        let cart = Cart::new()
            .with_product(&discounted)
            .with_product(&product(2, "clothes"));
        assert_eq!(cart.total().to_string(), "$15.00");
        assert_eq!(Cart::new().total(), Price::ZERO);
    }
}
