//! Login, signup and logout route handlers.
//!
//! Both forms validate the credentials locally before calling the
//! marketplace, and re-render with a message when something is wrong.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use ecomgo_core::{Account, Cart, Credentials};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::components::Layout;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::marketplace::{AccountRecord, MarketplaceClient};
use crate::middleware::{OptionalAccount, clear_current_account, set_current_account};
use crate::state::AppState;

const LOGIN_REJECTED: &str =
    "Either your inputted credentials are incorrect or the account does not exist.";
const USERNAME_TAKEN: &str = "This username is already taken. Please use another one.";
const MARKETPLACE_DOWN: &str = "The marketplace is unavailable right now. Please try again later.";

/// Which of the two credential forms is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    LogIn,
    SignUp,
}

impl CredentialsMode {
    /// Page heading and button label.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::LogIn => "Log in",
            Self::SignUp => "Sign up",
        }
    }

    /// Where the form posts to.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::LogIn => "/account/login",
            Self::SignUp => "/account/signup",
        }
    }

    /// Whether this is the signup form.
    #[must_use]
    pub const fn is_sign_up(&self) -> bool {
        matches!(self, Self::SignUp)
    }

    const fn rejected_message(self) -> &'static str {
        match self {
            Self::LogIn => LOGIN_REJECTED,
            Self::SignUp => USERNAME_TAKEN,
        }
    }

    const fn rejected_status(self) -> StatusCode {
        match self {
            Self::LogIn => StatusCode::UNAUTHORIZED,
            Self::SignUp => StatusCode::CONFLICT,
        }
    }
}

/// Login and signup form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login / signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/credentials.html")]
pub struct CredentialsTemplate {
    pub layout: Layout,
    pub mode: CredentialsMode,
    pub username: String,
    pub error: Option<String>,
}

impl CredentialsTemplate {
    fn respond(
        layout: Layout,
        mode: CredentialsMode,
        username: String,
        status: StatusCode,
        error: impl Into<String>,
    ) -> Response {
        let template = Self {
            layout,
            mode,
            username,
            error: Some(error.into()),
        };
        (status, template).into_response()
    }
}

/// Display the login page.
pub async fn login_page(OptionalAccount(account): OptionalAccount, layout: Layout) -> Response {
    credentials_page(account, layout, CredentialsMode::LogIn)
}

/// Display the signup page.
pub async fn signup_page(OptionalAccount(account): OptionalAccount, layout: Layout) -> Response {
    credentials_page(account, layout, CredentialsMode::SignUp)
}

fn credentials_page(account: Option<Account>, layout: Layout, mode: CredentialsMode) -> Response {
    if account.is_some() {
        return Redirect::to("/account").into_response();
    }

    CredentialsTemplate {
        layout,
        mode,
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, layout, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<CredentialsForm>,
) -> Response {
    submit(&state, &session, layout, form, CredentialsMode::LogIn).await
}

/// Handle signup form submission.
#[instrument(skip(state, session, layout, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<CredentialsForm>,
) -> Response {
    submit(&state, &session, layout, form, CredentialsMode::SignUp).await
}

async fn submit(
    state: &AppState,
    session: &Session,
    layout: Layout,
    form: CredentialsForm,
    mode: CredentialsMode,
) -> Response {
    let credentials = match Credentials::parse(&form.username, &form.password) {
        Ok(credentials) => credentials,
        Err(e) => {
            return CredentialsTemplate::respond(
                layout,
                mode,
                form.username,
                StatusCode::BAD_REQUEST,
                e.to_string(),
            );
        }
    };

    let client = state.marketplace();
    let result = match mode {
        CredentialsMode::LogIn => client.log_in(&credentials).await,
        CredentialsMode::SignUp => client.create_account(&credentials).await,
    };

    let record = match result {
        Ok(record) => record,
        Err(e) if e.is_rejection() => {
            info!(reason = %e, "Credentials rejected");
            return CredentialsTemplate::respond(
                layout,
                mode,
                form.username,
                mode.rejected_status(),
                mode.rejected_message(),
            );
        }
        Err(e) => {
            warn!(error = %e, "Login call failed");
            return CredentialsTemplate::respond(
                layout,
                mode,
                form.username,
                StatusCode::BAD_GATEWAY,
                MARKETPLACE_DOWN,
            );
        }
    };

    let cart = cart_for(client, &credentials, &record, mode).await;
    let account = account_from_record(credentials, &record, cart);
    if let Err(e) = set_current_account(session, &account).await {
        return AppError::from(e).into_response();
    }
    set_sentry_user(account.username());
    info!("Logged in");

    Redirect::to("/account").into_response()
}

/// The cart to start the session with.
///
/// Taken from the login answer when it has one, else fetched. A new account
/// starts empty. A failed fetch also starts empty; the login still stands.
async fn cart_for(
    client: &MarketplaceClient,
    credentials: &Credentials,
    record: &AccountRecord,
    mode: CredentialsMode,
) -> Cart {
    if let Some(cart) = record.cart() {
        return cart;
    }
    if mode.is_sign_up() {
        return Cart::default();
    }

    client.get_cart(credentials).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load cart at login");
        Cart::default()
    })
}

fn account_from_record(credentials: Credentials, record: &AccountRecord, cart: Cart) -> Account {
    Account::new(credentials)
        .with_bio(record.bio.clone().unwrap_or_default())
        .with_cart(cart)
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_account(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
