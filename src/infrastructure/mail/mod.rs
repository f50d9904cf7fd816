//! Outbound confirmation email.
//!
//! Provides a [`Notifier`] trait with two implementations:
//! - [`SmtpNotifier`] - Sends through an authenticated SMTP relay
//! - [`DisabledNotifier`] - Always fails; used when relay credentials are absent

mod disabled_notifier;
mod message;
mod service;
mod smtp_notifier;

pub use disabled_notifier::DisabledNotifier;
pub use message::{ConfirmationEmail, confirmation_subject};
pub use service::{MailError, Notifier};
pub use smtp_notifier::{SmtpNotifier, SmtpSecurity, SmtpSettings};

#[cfg(test)]
pub use service::MockNotifier;
