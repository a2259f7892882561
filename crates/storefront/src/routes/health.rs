//! Health checks.

use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::state::AppState;

/// Liveness: the process is up.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: the marketplace answers.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.marketplace().get_most_rated_products(1).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "marketplace unavailable")
        }
    }
}
