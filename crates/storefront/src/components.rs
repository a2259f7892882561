//! View data shared by many templates.
//!
//! - [`Layout`] - what `base.html` needs: who is logged in, the chat
//!   conversation, the current URL
//! - [`ProductCardView`] - one product card
//! - [`PaginationView`] - page controls for a paginated list

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use ecomgo_core::{Account, CategoryFilter, Pagination, Product, ReloadFactors, is_in_cart};
use tower_sessions::Session;

use crate::content::render_markdown;
use crate::marketplace::{ChatMessage, MarketplaceClient};
use crate::middleware::current_account;
use crate::models::session_keys;

/// Placeholder encoding `&` in usernames used as path segments.
const AMPERSAND_TOKEN: &str = "[amps]";

/// Profile link for a username.
///
/// `&` is written as `[amps]` before percent-encoding, matching the links
/// the marketplace's other clients produce.
#[must_use]
pub fn user_href(username: &str) -> String {
    let token = username.replace('&', AMPERSAND_TOKEN);
    format!("/users/{}", urlencoding::encode(&token))
}

/// Undo the `[amps]` encoding of a decoded path segment.
#[must_use]
pub fn decode_username(segment: &str) -> String {
    segment.replace(AMPERSAND_TOKEN, "&")
}

// =============================================================================
// Layout
// =============================================================================

/// One chat message, ready to render.
#[derive(Debug, Clone)]
pub struct ChatMessageView {
    pub from_chatbot: bool,
    pub html: String,
}

impl From<&ChatMessage> for ChatMessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            from_chatbot: message.is_from_chatbot(),
            html: render_markdown(&message.content),
        }
    }
}

/// Data every page passes to `base.html`.
///
/// Extracted from the request: the session gives the account and chat,
/// the URI gives the path chat and cart forms return to.
#[derive(Debug, Clone)]
pub struct Layout {
    pub username: Option<String>,
    pub conversation: Vec<ChatMessageView>,
    pub current_path: String,
    pub categories: Vec<&'static str>,
}

impl Layout {
    /// Layout for a visitor with no session.
    #[must_use]
    pub fn anonymous(current_path: impl Into<String>) -> Self {
        Self {
            username: None,
            conversation: Vec::new(),
            current_path: current_path.into(),
            categories: CategoryFilter::options()
                .into_iter()
                .filter(CategoryFilter::is_restricted)
                .map(|c| c.label())
                .collect(),
        }
    }

    /// Layout for the visitor owning `session`.
    pub async fn load(session: &Session, current_path: impl Into<String>) -> Self {
        let account = current_account(session).await;
        let conversation = load_conversation(session).await;

        Self {
            username: account.map(|a| a.username().to_string()),
            conversation: conversation.iter().map(ChatMessageView::from).collect(),
            ..Self::anonymous(current_path)
        }
    }

    /// Whether someone is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }
}

impl<S> FromRequestParts<S> for Layout
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current_path = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();

        Ok(match parts.extensions.get::<Session>() {
            Some(session) => Self::load(session, current_path).await,
            None => Self::anonymous(current_path),
        })
    }
}

/// Read the chat conversation from the session.
pub async fn load_conversation(session: &Session) -> Vec<ChatMessage> {
    session
        .get::<Vec<ChatMessage>>(session_keys::CONVERSATION)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

// =============================================================================
// Product cards
// =============================================================================

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub href: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub owner: String,
    pub owner_href: String,
    pub category: String,
    /// Price after discount.
    pub price: String,
    /// List price, shown struck through when a discount applies.
    pub list_price: Option<String>,
    pub in_cart: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, client: &MarketplaceClient, account: Option<&Account>) -> Self {
        Self {
            id: product.product_id.get(),
            href: format!("/products/{}", product.product_id),
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: client.image_url(&product.image_file),
            owner: product.owner.clone(),
            owner_href: user_href(&product.owner),
            category: product.category.clone(),
            price: product.discounted_price().to_string(),
            list_price: product
                .is_discounted()
                .then(|| product.list_price().to_string()),
            in_cart: is_in_cart(product.product_id, account),
        }
    }

    /// Cards for a list of products.
    #[must_use]
    pub fn list(
        products: &[Product],
        client: &MarketplaceClient,
        account: Option<&Account>,
    ) -> Vec<Self> {
        products
            .iter()
            .map(|product| Self::new(product, client, account))
            .collect()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// One page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Page controls for a paginated list; no links when the list is empty.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub pages: Vec<PageLink>,
}

impl PaginationView {
    /// Links for every page of `pagination`.
    ///
    /// Each link repeats `params` and carries the reload-factor token, so a
    /// request whose inputs changed since the link was rendered lands on
    /// page 1.
    #[must_use]
    pub fn new(
        pagination: &Pagination,
        path: &str,
        params: &[(&str, &str)],
        factors: &ReloadFactors,
    ) -> Self {
        let mut base = params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>();
        base.push(format!("rf={}", factors.token()));
        let base = base.join("&");

        let pages = pagination
            .page_numbers()
            .map(|number| PageLink {
                number,
                href: format!("{path}?{base}&page={number}"),
                current: number == pagination.current_page(),
            })
            .collect();

        Self { pages }
    }

    /// Whether controls should be drawn at all: whenever there is
    /// something to page through, even a single page.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.pages.is_empty()
    }
}
