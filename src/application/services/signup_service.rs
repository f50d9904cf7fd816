//! Signup workflow service.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::entities::SignupRecord;
use crate::domain::outcome::{Delivery, Rejection, SignupOutcome};
use crate::domain::repositories::{SignupRepository, StoreError};
use crate::infrastructure::mail::Notifier;
use crate::utils::email_validator::{is_valid_email, normalize_email};

/// Runs the validate → check-duplicate → persist → notify sequence.
///
/// Every failure is converted to a [`SignupOutcome`] here; nothing below
/// this service reaches the HTTP caller as an error.
///
/// # Ordering
///
/// Within one call the membership check happens before the append, which
/// happens before the notification. Across concurrent calls there is no
/// mutual exclusion: two submissions of the same new address may both pass
/// the check and both be appended.
pub struct SignupService {
    repository: Arc<dyn SignupRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SignupService {
    /// Creates a new signup service.
    pub fn new(repository: Arc<dyn SignupRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Processes one form submission.
    ///
    /// # Outcomes
    ///
    /// - Blank input → `Rejected(Empty)`
    /// - Input failing the email pattern → `Rejected(InvalidFormat)`
    /// - Address already stored → `Rejected(Duplicate)`
    /// - Store read or write failure → `Rejected(StoreError)`; nothing is appended
    ///   when the read fails
    /// - Stored and confirmation sent → `Accepted(Confirmed)`
    /// - Stored but confirmation failed → `Accepted(Unconfirmed)`; the record is kept
    pub async fn submit(&self, raw_email: &str) -> SignupOutcome {
        let outcome = self.run(raw_email).await;

        metrics::counter!("signup_outcomes_total", "outcome" => outcome.as_str()).increment(1);
        info!(outcome = outcome.as_str(), "Signup processed");

        outcome
    }

    async fn run(&self, raw_email: &str) -> SignupOutcome {
        let email = normalize_email(raw_email);

        if email.is_empty() {
            return SignupOutcome::Rejected(Rejection::Empty);
        }

        if !is_valid_email(email) {
            debug!("Rejected malformed email: {:?}", email);
            return SignupOutcome::Rejected(Rejection::InvalidFormat);
        }

        match self.repository.contains(email).await {
            Ok(true) => {
                debug!("Duplicate signup: {}", email);
                return SignupOutcome::Rejected(Rejection::Duplicate);
            }
            Ok(false) => {}
            Err(e) => {
                error!("Duplicate check failed: {}", e);
                return SignupOutcome::Rejected(Rejection::StoreError);
            }
        }

        let record = SignupRecord::new(email);
        if let Err(e) = self.repository.append(&record).await {
            error!("Failed to store signup: {}", e);
            return SignupOutcome::Rejected(Rejection::StoreError);
        }

        if self.notifier.send(email).await {
            SignupOutcome::Accepted(Delivery::Confirmed)
        } else {
            warn!("Signup stored but confirmation was not sent");
            SignupOutcome::Accepted(Delivery::Unconfirmed)
        }
    }

    /// Number of stored signups; used to probe the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub async fn signup_count(&self) -> Result<usize, StoreError> {
        Ok(self.repository.list().await?.len())
    }

    /// Whether the notifier has relay credentials.
    pub fn notifier_configured(&self) -> bool {
        self.notifier.is_configured()
    }
}
