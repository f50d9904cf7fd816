//! SMTP relay notifier.

use super::message::ConfirmationEmail;
use super::service::{MailError, Notifier};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

/// SMTP reply code for rejected credentials.
const AUTH_REJECTED: &str = "535";

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS from the first byte (SMTPS, usually port 465).
    Tls,
    /// Plain connection upgraded with `STARTTLS` (usually port 587).
    StartTls,
    /// Unencrypted. Only for local relays and tests.
    None,
}

impl SmtpSecurity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "tls" | "ssl" => Some(Self::Tls),
            "starttls" => Some(Self::StartTls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }
}

/// Connection and sender settings for [`SmtpNotifier`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: String,
    pub password: String,
    /// Sender address; defaults to `username` when not set.
    pub from: Option<String>,
    pub site_name: String,
}

/// Sends confirmations through an authenticated SMTP relay.
///
/// Each message opens its own connection (no pooling) and is attempted once;
/// the request waits for the relay to accept or reject it. Timeouts are the
/// transport defaults.
pub struct SmtpNotifier {
    from: Mailbox,
    site_name: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Builds the transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Address`] if the sender is not a valid mailbox and
    /// [`MailError::Transport`] if the relay host is invalid.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from: Mailbox = settings
            .from
            .as_deref()
            .unwrap_or(settings.username.as_str())
            .parse()?;

        let builder = match settings.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            from,
            site_name: settings.site_name.clone(),
            transport,
        })
    }

    /// Builds the multipart (plain text + HTML) confirmation for `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] if the recipient is invalid or rendering fails.
    pub fn compose(&self, recipient: &str) -> Result<Message, MailError> {
        let to: Mailbox = recipient.parse()?;
        let content = ConfirmationEmail::render(&self.site_name)?;

        Ok(Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))?)
    }

    /// Composes and sends one confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] describing why the message was not delivered to the relay.
    pub async fn try_send(&self, recipient: &str) -> Result<(), MailError> {
        let message = self.compose(recipient)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn is_auth_rejection(err: &MailError) -> bool {
    match err {
        MailError::Transport(e) => e
            .status()
            .is_some_and(|code| code.to_string() == AUTH_REJECTED),
        _ => false,
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, recipient: &str) -> bool {
        match self.try_send(recipient).await {
            Ok(()) => {
                info!("Confirmation email sent");
                debug!("Confirmation recipient: {}", recipient);
                true
            }
            Err(e) if is_auth_rejection(&e) => {
                error!(
                    "SMTP authentication failed, check SMTP_USERNAME and SMTP_PASSWORD: {}",
                    e
                );
                false
            }
            Err(e) => {
                error!("Failed to send confirmation email: {}", e);
                false
            }
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}
