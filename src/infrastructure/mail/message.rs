//! Confirmation message content.

use askama::Template;

/// Plain-text body of the confirmation.
#[derive(Template)]
#[template(path = "email/confirmation.txt")]
struct ConfirmationText<'a> {
    site_name: &'a str,
}

/// HTML alternative of the confirmation.
#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationHtml<'a> {
    site_name: &'a str,
}

/// Subject line for the confirmation.
pub fn confirmation_subject(site_name: &str) -> String {
    format!("Welcome to {}!", site_name)
}

/// Rendered subject and bodies of one confirmation email.
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ConfirmationEmail {
    /// Renders the confirmation for the given site name.
    ///
    /// # Errors
    ///
    /// Returns an [`askama::Error`] if a template fails to render.
    pub fn render(site_name: &str) -> Result<Self, askama::Error> {
        Ok(Self {
            subject: confirmation_subject(site_name),
            text: ConfirmationText { site_name }.render()?,
            html: ConfirmationHtml { site_name }.render()?,
        })
    }
}
