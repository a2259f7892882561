//! About pages: FAQ and the contact form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecomgo_core::Email;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::components::Layout;
use crate::content::FaqEntry;
use crate::filters;
use crate::state::AppState;

const CONTACT_THANKS: &str = "Thank you for contacting us! We will respond to you shortly via e-mail.";
const CONTACT_NO_FEEDBACK: &str = "Sorry, but you must include a feedback.";
const CONTACT_BAD_EMAIL: &str = "Sorry, but you have included an invalid email.";

/// FAQ page template.
#[derive(Template, WebTemplate)]
#[template(path = "about/faq.html")]
pub struct FaqTemplate {
    pub layout: Layout,
    pub entries: Vec<FaqEntry>,
}

/// Contact form data.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub feedback: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "about/contact_us.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub email: String,
    pub feedback: String,
    pub message: Option<&'static str>,
    pub success: bool,
}

/// Display the FAQ.
pub async fn faq(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    FaqTemplate {
        layout,
        entries: state.content().faq().to_vec(),
    }
}

/// Display the contact form.
pub async fn contact_page(layout: Layout) -> impl IntoResponse {
    ContactTemplate {
        layout,
        email: String::new(),
        feedback: String::new(),
        message: None,
        success: false,
    }
}

/// Validate a contact submission.
///
/// The email is checked before the feedback.
fn validate(form: &ContactForm) -> Result<Email, &'static str> {
    let email = Email::parse(form.email.trim()).map_err(|_| CONTACT_BAD_EMAIL)?;
    if form.feedback.trim().is_empty() {
        return Err(CONTACT_NO_FEEDBACK);
    }
    Ok(email)
}

/// Handle a contact submission.
///
/// The marketplace has no feedback endpoint; accepted feedback is logged.
#[instrument(skip_all)]
pub async fn contact(layout: Layout, Form(form): Form<ContactForm>) -> Response {
    match validate(&form) {
        Ok(email) => {
            info!(
                email_domain = %email.domain(),
                feedback_chars = form.feedback.trim().chars().count(),
                "Contact feedback received"
            );
            ContactTemplate {
                layout,
                email: String::new(),
                feedback: String::new(),
                message: Some(CONTACT_THANKS),
                success: true,
            }
            .into_response()
        }
        Err(message) => {
            let template = ContactTemplate {
                layout,
                email: form.email,
                feedback: form.feedback,
                message: Some(message),
                success: false,
            };
            (StatusCode::BAD_REQUEST, template).into_response()
        }
    }
}
