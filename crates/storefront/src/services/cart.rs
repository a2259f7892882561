//! Cart updates.
//!
//! The cart in the session is what every page renders. Adding or removing
//! a product replaces it first, then tells the marketplace. A failed
//! marketplace call is logged and the local cart is kept as is.

use ecomgo_core::{Account, Product, ProductId};
use tracing::{instrument, warn};

use crate::marketplace::MarketplaceClient;

/// Add a product to the account's cart.
///
/// Adding a product that is already in the cart changes nothing and makes
/// no API call.
#[instrument(skip_all, fields(username = %account.username(), product_id = %product.product_id))]
pub async fn add_product(client: &MarketplaceClient, account: Account, product: &Product) -> Account {
    if account.cart.contains(product.product_id) {
        return account;
    }

    let cart = account.cart.with_product(product);
    let account = account.with_cart(cart);

    if let Err(e) = client
        .add_to_cart(&account.credentials, product.product_id)
        .await
    {
        warn!(error = %e, "Cart sync failed after add");
    }

    account
}

/// Remove a product from the account's cart.
///
/// Removing a product that is not in the cart changes nothing and makes no
/// API call.
#[instrument(skip_all, fields(username = %account.username(), product_id = %product_id))]
pub async fn remove_product(
    client: &MarketplaceClient,
    account: Account,
    product_id: ProductId,
) -> Account {
    if !account.cart.iter().any(|p| p.product_id == product_id) {
        return account;
    }

    let cart = account.cart.without_product(product_id);
    let account = account.with_cart(cart);

    if let Err(e) = client.remove_from_cart(&account.credentials, product_id).await {
        warn!(error = %e, "Cart sync failed after remove");
    }

    account
}
