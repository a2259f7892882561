//! Cart route handlers.
//!
//! The cart lives in the session with the account. Both actions update it
//! there, then redirect back to the page the button was on.

use axum::{Form, extract::State, response::Redirect};
use ecomgo_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{RequireAccount, set_current_account};
use crate::routes::safe_redirect;
use crate::services::cart;
use crate::state::AppState;

/// Cart button form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub product_id: ProductId,
    pub redirect_to: Option<String>,
}

/// Add a product to the cart.
#[instrument(skip(state, session, account), fields(username = %account.username()))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(account): RequireAccount,
    Form(form): Form<CartForm>,
) -> Result<Redirect> {
    let product = state
        .marketplace()
        .get_product(form.product_id)
        .await
        .map_err(|e| AppError::not_found_or(e, format!("product {}", form.product_id)))?;

    let account = cart::add_product(state.marketplace(), account, &product).await;
    set_current_account(&session, &account).await?;

    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", form.product_id.to_string().as_str())]),
    );

    Ok(Redirect::to(safe_redirect(form.redirect_to.as_deref())))
}

/// Remove a product from the cart.
#[instrument(skip(state, session, account), fields(username = %account.username()))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(account): RequireAccount,
    Form(form): Form<CartForm>,
) -> Result<Redirect> {
    let account = cart::remove_product(state.marketplace(), account, form.product_id).await;
    set_current_account(&session, &account).await?;

    add_breadcrumb(
        "cart",
        "Removed product",
        Some(&[("product_id", form.product_id.to_string().as_str())]),
    );

    Ok(Redirect::to(safe_redirect(form.redirect_to.as_deref())))
}
