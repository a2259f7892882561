//! Session-related types.
//!
//! The logged-in account (credentials, bio, cart), the chat conversation and
//! the catalog query last shown live in the session. Each is replaced
//! wholesale on every change.

/// Session keys.
pub mod keys {
    /// Key for the logged-in [`ecomgo_core::Account`].
    pub const ACCOUNT: &str = "account";

    /// Key for the chat conversation, a list of
    /// [`crate::marketplace::ChatMessage`].
    pub const CONVERSATION: &str = "conversation";

    /// Key for the [`ecomgo_core::CatalogQuery`] whose listing the visitor
    /// was last shown.
    pub const SHOWN_CATALOG: &str = "shown_catalog";
}
