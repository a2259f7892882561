//! Support chat.
//!
//! The conversation lives in the session and is drawn by the layout on
//! every page. Sending a message asks the chatbot with the conversation so
//! far, appends both messages and returns to the page it came from.

use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::components::load_conversation;
use crate::error::Result;
use crate::marketplace::{CHATBOT_SENDER, ChatMessage, ChatRequest};
use crate::middleware::current_account;
use crate::models::session_keys;
use crate::routes::safe_redirect;
use crate::state::AppState;

/// Longest message a visitor may send, in characters.
pub const MAX_MESSAGE_CHARS: usize = 100;

/// Sender name for visitors who are not logged in.
pub const GUEST_SENDER: &str = "guest";

/// Reply shown when the chatbot cannot be reached.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again later.";

/// Chat form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
    pub redirect_to: Option<String>,
}

/// The message to send, if it is sendable.
fn sendable(message: &str) -> Option<&str> {
    let message = message.trim();
    (!message.is_empty() && message.chars().count() <= MAX_MESSAGE_CHARS).then_some(message)
}

/// Send a chat message.
#[instrument(skip_all)]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<Redirect> {
    let back = format!("{}#chat", safe_redirect(form.redirect_to.as_deref()));

    let Some(content) = sendable(&form.message) else {
        return Ok(Redirect::to(&back));
    };

    let sender = current_account(&session)
        .await
        .map_or_else(|| GUEST_SENDER.to_string(), |a| a.username().to_string());
    let mut conversation = load_conversation(&session).await;

    let request = ChatRequest {
        sender: &sender,
        content,
        conversation: &conversation,
    };
    let reply = match state.marketplace().chat(&request).await {
        Ok(reply) => ChatMessage::new(CHATBOT_SENDER, reply.content),
        Err(e) => {
            warn!(error = %e, "Chatbot call failed");
            ChatMessage::new(CHATBOT_SENDER, FALLBACK_REPLY)
        }
    };

    conversation.push(ChatMessage::new(sender, content));
    conversation.push(reply);
    session
        .insert(session_keys::CONVERSATION, &conversation)
        .await?;

    Ok(Redirect::to(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sendable() {
        assert_eq!(sendable("  hello "), Some("hello"));
        assert_eq!(sendable("   "), None);
        assert_eq!(sendable(&"a".repeat(MAX_MESSAGE_CHARS)).map(str::len), Some(100));
        assert_eq!(sendable(&"a".repeat(MAX_MESSAGE_CHARS + 1)), None);
    }
}
