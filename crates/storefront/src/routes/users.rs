//! User directory route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use ecomgo_core::{Pagination, ReloadFactors, User};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::components::{Layout, PaginationView, ProductCardView, decode_username, user_href};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAccount;
use crate::routes::parse_page;
use crate::state::AppState;

/// Shown instead of an empty bio.
pub const NO_BIO: &str = "[No bio provided]";

/// Directory query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryParams {
    pub search_query: Option<String>,
    pub page: Option<String>,
    pub rf: Option<String>,
}

/// One row of the directory.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub username: String,
    pub href: String,
    pub bio: String,
    pub product_count: usize,
}

impl From<&User> for UserRowView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            href: user_href(&user.username),
            bio: user.bio().unwrap_or(NO_BIO).to_string(),
            product_count: user.owned_products.len(),
        }
    }
}

/// User directory template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub layout: Layout,
    pub search_query: String,
    pub users: Vec<UserRowView>,
    pub pagination: PaginationView,
}

/// Public profile template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub layout: Layout,
    pub username: String,
    pub bio: String,
    pub products: Vec<ProductCardView>,
}

/// Display the user directory.
///
/// An empty search lists everyone. A failed fetch shows an empty list.
#[instrument(skip(state, layout))]
pub async fn index(
    State(state): State<AppState>,
    layout: Layout,
    Query(params): Query<DirectoryParams>,
) -> impl IntoResponse {
    let search_query = params.search_query.as_deref().unwrap_or_default().trim();
    let client = state.marketplace();

    let result = if search_query.is_empty() {
        client.get_all_users().await
    } else {
        client.search_users(search_query).await
    };
    let users = result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load users");
        Vec::new()
    });

    let factors = ReloadFactors::from_values(&[search_query]);
    let pagination = Pagination::for_request(
        users.len(),
        parse_page(params.page.as_deref()),
        &factors,
        params.rf.as_deref(),
    );

    UsersIndexTemplate {
        search_query: search_query.to_string(),
        users: pagination
            .slice(&users)
            .iter()
            .map(UserRowView::from)
            .collect(),
        pagination: PaginationView::new(
            &pagination,
            "/users",
            &[("search_query", search_query)],
            &factors,
        ),
        layout,
    }
}

/// Display a user's profile and the products they sell.
#[instrument(skip(state, account, layout))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAccount(account): OptionalAccount,
    layout: Layout,
    Path(segment): Path<String>,
) -> Result<impl IntoResponse> {
    let username = decode_username(&segment);
    let client = state.marketplace();

    let user = client
        .get_user(&username)
        .await
        .map_err(|e| AppError::not_found_or(e, format!("user {username}")))?;

    Ok(UserShowTemplate {
        bio: user.bio().unwrap_or(NO_BIO).to_string(),
        products: ProductCardView::list(&user.owned_products, client, account.as_ref()),
        username: user.username,
        layout,
    })
}
