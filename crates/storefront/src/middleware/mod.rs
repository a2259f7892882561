//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, echo `x-request-id`)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Not-found page (render 404s with the full layout)

pub mod auth;
pub mod not_found;
pub mod request_id;
pub mod session;

pub use auth::{
    OptionalAccount, RequireAccount, clear_current_account, current_account, set_current_account,
};
pub use not_found::not_found_middleware;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
