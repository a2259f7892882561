//! Account extractors and session helpers.
//!
//! An account in the session is what "logged in" means. The session holds
//! the whole [`Account`]; every change writes a new one.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use ecomgo_core::Account;
use tower_sessions::Session;

use crate::models::session_keys;

/// Where visitors are sent when an action needs a login.
pub const LOGIN_PATH: &str = "/account/login";

/// Extractor that requires a logged-in account.
///
/// If nobody is logged in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn account_page(
///     RequireAccount(account): RequireAccount,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", account.username())
/// }
/// ```
pub struct RequireAccount(pub Account);

/// Error returned when a login is required but nobody is logged in.
pub enum AccountRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// Session layer missing from the stack.
    NoSession,
}

impl IntoResponse for AccountRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = AccountRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AccountRejection::NoSession)?;

        current_account(session)
            .await
            .map(Self)
            .ok_or(AccountRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the logged-in account.
///
/// Unlike `RequireAccount`, this never rejects.
pub struct OptionalAccount(pub Option<Account>);

impl<S> FromRequestParts<S> for OptionalAccount
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = match parts.extensions.get::<Session>() {
            Some(session) => current_account(session).await,
            None => None,
        };

        Ok(Self(account))
    }
}

/// Read the logged-in account from the session.
pub async fn current_account(session: &Session) -> Option<Account> {
    session
        .get::<Account>(session_keys::ACCOUNT)
        .await
        .ok()
        .flatten()
}

/// Store the logged-in account, replacing any previous one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &Account,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ACCOUNT, account).await
}

/// Log out: drop the account from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_account(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Account>(session_keys::ACCOUNT).await?;
    Ok(())
}
