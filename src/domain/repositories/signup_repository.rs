//! Repository trait for the duplicate store.

use crate::domain::entities::SignupRecord;
use async_trait::async_trait;

/// Errors raised by a duplicate store backend.
///
/// The workflow collapses every variant into a single "store unavailable"
/// outcome; the variants exist so the cause can be logged server-side.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote store request failed: {0}")]
    Remote(String),

    #[error("Remote store authentication failed: {0}")]
    Auth(String),

    #[error("Unexpected response from remote store: {0}")]
    Decode(String),

    #[error("Store is not configured: {0}")]
    Unavailable(String),
}

/// Repository interface for accepted signups.
///
/// Membership is an exact, case-sensitive match on the stored email.
///
/// # Concurrency
///
/// Implementations add no coordination of their own: `contains` followed by
/// `append` is a check-then-act sequence, and two concurrent submissions of
/// the same address can both observe `false` before either appends.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileSignupRepository`] - Append-only text file
/// - [`crate::infrastructure::persistence::SheetsSignupRepository`] - Google Sheets
/// - [`crate::infrastructure::persistence::UnavailableSignupRepository`] - Always fails
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupRepository: Send + Sync {
    /// Returns `true` if `email` is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing medium cannot be read.
    async fn contains(&self, email: &str) -> Result<bool, StoreError>;

    /// Appends one record.
    ///
    /// Does not check for duplicates; callers are expected to call
    /// [`SignupRepository::contains`] first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record could not be written.
    async fn append(&self, record: &SignupRecord) -> Result<(), StoreError>;

    /// Lists stored emails in storage order.
    ///
    /// Used by the admin tool and the health probe.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing medium cannot be read.
    async fn list(&self) -> Result<Vec<String>, StoreError>;
}
