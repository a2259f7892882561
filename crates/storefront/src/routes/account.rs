//! Account page route handlers.
//!
//! All routes here require login. The account page shows the bio and the
//! cart with its checkout summary.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::components::{Layout, ProductCardView};
use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::middleware::{RequireAccount, clear_current_account, set_current_account};
use crate::routes::users::NO_BIO;
use crate::state::AppState;

/// How the cart is laid out on the account page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartDisplay {
    #[default]
    Row,
    Column,
}

impl CartDisplay {
    fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some("column") => Self::Column,
            _ => Self::Row,
        }
    }
}

/// Account page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AccountParams {
    /// `row` or `column`.
    pub display: Option<String>,
    /// Present when the bio editor is open.
    pub edit_bio: Option<String>,
}

/// Bio form data.
#[derive(Debug, Deserialize)]
pub struct BioForm {
    #[serde(default)]
    pub new_bio: String,
}

/// One line of the checkout summary.
#[derive(Debug, Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub price: String,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub layout: Layout,
    pub username: String,
    pub bio: String,
    pub editing_bio: bool,
    pub column_layout: bool,
    pub cart: Vec<ProductCardView>,
    pub checkout: Vec<CheckoutLineView>,
    pub total: String,
}

/// Display the account page.
#[instrument(skip(state, account, layout), fields(username = %account.username()))]
pub async fn index(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    layout: Layout,
    Query(params): Query<AccountParams>,
) -> impl IntoResponse {
    let display = CartDisplay::parse_lenient(params.display.as_deref());

    let checkout = account
        .cart
        .iter()
        .map(|product| CheckoutLineView {
            name: product.name.clone(),
            price: product.discounted_price().to_string(),
        })
        .collect();

    AccountTemplate {
        username: account.username().to_string(),
        bio: account.bio().unwrap_or(NO_BIO).to_string(),
        editing_bio: params.edit_bio.is_some(),
        column_layout: display == CartDisplay::Column,
        cart: ProductCardView::list(
            account.cart.as_slice(),
            state.marketplace(),
            Some(&account),
        ),
        checkout,
        total: account.cart.total().to_string(),
        layout,
    }
}

/// Replace the bio.
///
/// An empty bio cancels the edit. The session keeps the old bio if the
/// marketplace rejects the new one.
#[instrument(skip(state, session, account, form), fields(username = %account.username()))]
pub async fn edit_bio(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(account): RequireAccount,
    Form(form): Form<BioForm>,
) -> Result<Redirect> {
    let new_bio = form.new_bio.trim();
    if new_bio.is_empty() {
        return Ok(Redirect::to("/account"));
    }

    match state
        .marketplace()
        .edit_bio(&account.credentials, new_bio)
        .await
    {
        Ok(()) => {
            let account = account.with_bio(new_bio);
            set_current_account(&session, &account).await?;
        }
        Err(e) => warn!(error = %e, "Failed to update bio"),
    }

    Ok(Redirect::to("/account"))
}

/// Delete the account and log out.
#[instrument(skip(state, session, account), fields(username = %account.username()))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(account): RequireAccount,
) -> Result<Redirect> {
    if let Err(e) = state
        .marketplace()
        .delete_account(&account.credentials)
        .await
    {
        warn!(error = %e, "Failed to delete account");
        return Ok(Redirect::to("/account"));
    }

    clear_current_account(&session).await?;
    clear_sentry_user();
    info!("Account deleted");

    Ok(Redirect::to("/"))
}
