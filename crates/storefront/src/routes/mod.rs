//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (pings the marketplace)
//!
//! # Products
//! GET  /products                      - Catalog (category, search_query, page, rf)
//! GET  /products/{id}                 - Product detail (sentiment, add_review, edit_review)
//! POST /products/{id}/rating          - Rate / unrate toggle
//! POST /products/{id}/reviews         - Add review
//! POST /products/{id}/reviews/{idx}   - Edit review
//! POST /products/{id}/reviews/{idx}/delete - Delete review
//!
//! # Cart
//! POST /cart/add                      - Add to cart, back to `redirect_to`
//! POST /cart/remove                   - Remove from cart, back to `redirect_to`
//!
//! # Users
//! GET  /users                         - User directory (search_query, page, rf)
//! GET  /users/{username}              - Public profile
//!
//! # Account
//! GET  /account                       - Account page (display, edit_bio)
//! GET  /account/login                 - Login page
//! POST /account/login                 - Login action
//! GET  /account/signup                - Signup page
//! POST /account/signup                - Signup action
//! POST /account/logout                - Logout action
//! POST /account/bio                   - Edit bio
//! POST /account/delete                - Delete account
//!
//! # Chat
//! POST /chat                          - Send a chat message, back to `redirect_to`
//!
//! # About
//! GET  /about/faq                     - FAQ
//! GET  /about/contact_us              - Contact form
//! POST /about/contact_us              - Contact form submission
//!
//! Anything else                       - 404 page
//! ```

pub mod about;
pub mod account;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod errors;
pub mod health;
pub mod home;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/rating", post(products::toggle_rating))
        .route("/{id}/reviews", post(reviews::create))
        .route("/{id}/reviews/{idx}", post(reviews::update))
        .route("/{id}/reviews/{idx}/delete", post(reviews::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the user directory routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{username}", get(users::show))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/bio", post(account::edit_bio))
        .route("/delete", post(account::delete))
}

/// Create the about routes router.
pub fn about_routes() -> Router<AppState> {
    Router::new()
        .route("/faq", get(about::faq))
        .route("/contact_us", get(about::contact_page).post(about::contact))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/users", user_routes())
        .nest("/account", account_routes())
        .nest("/about", about_routes())
        .route("/chat", post(chat::send))
        .fallback(errors::fallback)
}

/// A same-site path to redirect to, or `/`.
///
/// Only absolute paths are accepted, so forms cannot bounce visitors to
/// another site.
#[must_use]
pub fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Lenient page-number parsing: anything that is not a number is page 1.
#[must_use]
pub fn parse_page(page: Option<&str>) -> Option<usize> {
    page.and_then(|p| p.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect(Some("/products/7?sentiment=all")), "/products/7?sentiment=all");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/");
        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(Some("/\\evil.example")), "/");
        assert_eq!(safe_redirect(None), "/");
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(Some("3")), Some(3));
        assert_eq!(parse_page(Some("abc")), None);
        assert_eq!(parse_page(None), None);
    }
}
