//! Review route handlers.
//!
//! Every action redirects back to the product page. Marketplace failures
//! are logged and the page shows whatever the marketplace has.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use ecomgo_core::{ProductId, ReviewIndex};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAccount;
use crate::routes::products::parse_product_id;
use crate::state::AppState;

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review: String,
}

fn parse_review_index(raw: &str) -> Result<ReviewIndex> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("review {raw}")))
}

fn product_path(id: ProductId) -> String {
    format!("/products/{id}")
}

/// Add a review.
#[instrument(skip(state, account, form), fields(username = %account.username()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Path(raw_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let id = parse_product_id(&raw_id)?;
    let text = form.review.trim();

    if text.is_empty() {
        return Ok(Redirect::to(&format!(
            "{}?add_review=1&empty_review=1",
            product_path(id)
        )));
    }

    add_breadcrumb("review", "Added review", Some(&[("product_id", raw_id.as_str())]));
    if let Err(e) = state
        .marketplace()
        .add_review(&account.credentials, id, text)
        .await
    {
        warn!(error = %e, "Failed to add review");
    }

    Ok(Redirect::to(&product_path(id)))
}

/// Replace the text of one of the visitor's reviews.
#[instrument(skip(state, account, form), fields(username = %account.username()))]
pub async fn update(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Path((raw_id, raw_idx)): Path<(String, String)>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let id = parse_product_id(&raw_id)?;
    let index = parse_review_index(&raw_idx)?;
    let text = form.review.trim();

    if text.is_empty() {
        return Ok(Redirect::to(&format!(
            "{}?edit_review={index}&empty_review=1",
            product_path(id)
        )));
    }

    if let Err(e) = state
        .marketplace()
        .update_review(&account.credentials, id, index, text)
        .await
    {
        warn!(error = %e, "Failed to update review");
    }

    Ok(Redirect::to(&product_path(id)))
}

/// Delete one of the visitor's reviews.
#[instrument(skip(state, account), fields(username = %account.username()))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Path((raw_id, raw_idx)): Path<(String, String)>,
) -> Result<Redirect> {
    let id = parse_product_id(&raw_id)?;
    let index = parse_review_index(&raw_idx)?;

    add_breadcrumb("review", "Deleted review", Some(&[("product_id", raw_id.as_str())]));
    if let Err(e) = state
        .marketplace()
        .remove_review(&account.credentials, id, index)
        .await
    {
        warn!(error = %e, "Failed to delete review");
    }

    Ok(Redirect::to(&product_path(id)))
}
