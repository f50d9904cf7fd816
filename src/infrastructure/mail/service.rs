//! Notifier trait and error types.

use async_trait::async_trait;

/// Errors that can occur while composing or sending a confirmation.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail relay is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to render email template: {0}")]
    Template(#[from] askama::Error),

    #[error("Failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends the signup confirmation message.
///
/// Implementations make exactly one delivery attempt per call and never
/// retry or queue. Failures are logged by the implementation and collapsed to
/// `false`; callers cannot tell causes apart.
///
/// # Implementations
///
/// - [`crate::infrastructure::mail::SmtpNotifier`] - SMTP relay
/// - [`crate::infrastructure::mail::DisabledNotifier`] - Always returns `false`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a confirmation to `recipient`.
    ///
    /// Returns `true` only if the relay accepted the message.
    async fn send(&self, recipient: &str) -> bool;

    /// Whether relay credentials are present.
    ///
    /// Used by the health endpoint; does not contact the relay.
    fn is_configured(&self) -> bool;
}
