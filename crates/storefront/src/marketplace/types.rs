//! Request and response bodies of the marketplace API.
//!
//! Products, users and reviews are shared with the rest of the storefront
//! and live in `ecomgo-core`; this module only holds shapes that exist for
//! the wire.

use ecomgo_core::{Cart, Credentials, Product};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Sender name the chatbot uses for its replies.
pub const CHATBOT_SENDER: &str = "chatbot";

/// Account data returned by `log_in_account` and `create_account`.
///
/// The marketplace does not always include the cart; `get_cart` has it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub cart: Option<Vec<Product>>,
}

impl AccountRecord {
    /// The cart, deduplicated by product id, if the record carried one.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.cart.clone().map(Cart::from)
    }
}

/// Body of `edit_bio`.
#[derive(Debug, Serialize)]
pub struct EditBioRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub new_bio: &'a str,
}

impl<'a> EditBioRequest<'a> {
    #[must_use]
    pub fn new(credentials: &'a Credentials, new_bio: &'a str) -> Self {
        Self {
            username: credentials.username(),
            password: credentials.password().expose_secret(),
            new_bio,
        }
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Whether the chatbot wrote this message.
    #[must_use]
    pub fn is_from_chatbot(&self) -> bool {
        self.sender == CHATBOT_SENDER
    }
}

/// Body of `chatbot`: the new message plus everything said before it.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub sender: &'a str,
    pub content: &'a str,
    pub conversation: &'a [ChatMessage],
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_record_defaults() {
        let record: AccountRecord = serde_json::from_str("{}").unwrap();
        assert!(record.bio.is_none());
        assert!(record.cart().is_none());

        let record: AccountRecord = serde_json::from_str(r#"{"cart": []}"#).unwrap();
        assert!(record.cart().is_some_and(|cart| cart.is_empty()));
    }

    #[test]
    fn test_edit_bio_body() {
        let credentials = Credentials::parse("alice", "hunter2").unwrap();
        let body = serde_json::to_value(EditBioRequest::new(&credentials, "hi")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"username": "alice", "password": "hunter2", "new_bio": "hi"})
        );
    }

    #[test]
    fn test_chat_request_body() {
        let history = vec![ChatMessage::new("alice", "hello")];
        let body = serde_json::to_value(ChatRequest {
            sender: "alice",
            content: "where is my order?",
            conversation: &history,
        })
        .unwrap();
        assert_eq!(body["conversation"][0]["sender"], "alice");
        assert_eq!(body["content"], "where is my order?");
    }
}
