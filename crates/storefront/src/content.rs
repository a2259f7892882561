//! Static content and Markdown rendering.
//!
//! The FAQ is compiled into the binary from `content/faq.json` and parsed
//! once at startup. Chat messages are Markdown, rendered with comrak with
//! raw HTML stripped, since they come from visitors and the chatbot.

use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use serde::Deserialize;

const FAQ_JSON: &str = include_str!("../content/faq.json");

/// One FAQ entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Content store that holds all loaded content in memory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    faq: Arc<Vec<FaqEntry>>,
}

impl ContentStore {
    /// Load the embedded content.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded FAQ is not valid JSON.
    pub fn load() -> Result<Self, serde_json::Error> {
        let faq: Vec<FaqEntry> = serde_json::from_str(FAQ_JSON)?;
        tracing::debug!(entries = faq.len(), "Loaded FAQ");
        Ok(Self { faq: Arc::new(faq) })
    }

    /// FAQ entries in display order.
    #[must_use]
    pub fn faq(&self) -> &[FaqEntry] {
        &self.faq
    }
}

/// Render Markdown to HTML, dropping any raw HTML in the input.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.autolink = true;

    // Raw HTML is replaced with a comment
    options.render.r#unsafe = false;

    markdown_to_html(markdown, &options)
}
