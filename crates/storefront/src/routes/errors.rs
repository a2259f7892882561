//! Error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecomgo_core::Account;

use crate::components::{Layout, ProductCardView};
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub top_rated: Vec<ProductCardView>,
}

/// The full 404 page: a short message and the "Top Rated" strip.
pub async fn not_found_page(
    state: &AppState,
    layout: Layout,
    account: Option<&Account>,
) -> Response {
    let top_rated = state.top_rated().await;

    let template = NotFoundTemplate {
        top_rated: ProductCardView::list(&top_rated, state.marketplace(), account),
        layout,
    };

    (StatusCode::NOT_FOUND, template).into_response()
}

/// Fallback for unknown routes.
pub async fn fallback() -> AppError {
    AppError::NotFound("page".to_string())
}
