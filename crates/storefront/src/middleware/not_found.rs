//! Full-page rendering for 404 responses.
//!
//! Handlers signal "not found" through [`AppError`](crate::error::AppError),
//! which cannot reach the application state. This middleware sees the
//! [`NotFoundPage`] marker on the way out and renders the real page, with
//! the layout and top-rated suggestions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::components::Layout;
use crate::error::NotFoundPage;
use crate::middleware::current_account;
use crate::routes::errors;
use crate::state::AppState;

/// Replace marked 404 responses with the not-found page.
pub async fn not_found_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let current_path = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str())
        .to_string();

    let response = next.run(request).await;
    if response.extensions().get::<NotFoundPage>().is_none() {
        return response;
    }

    let (layout, account) = match &session {
        Some(session) => (
            Layout::load(session, current_path).await,
            current_account(session).await,
        ),
        None => (Layout::anonymous(current_path), None),
    };
    errors::not_found_page(&state, layout, account.as_ref()).await
}
