//! Notifier used when no relay credentials are configured.

use super::service::{MailError, Notifier};
use async_trait::async_trait;
use tracing::error;

/// A notifier whose every send fails.
pub struct DisabledNotifier;

impl DisabledNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DisabledNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _recipient: &str) -> bool {
        let err = MailError::NotConfigured("SMTP_USERNAME and SMTP_PASSWORD are not set".into());
        error!("Confirmation not sent: {}", err);
        false
    }

    fn is_configured(&self) -> bool {
        false
    }
}
