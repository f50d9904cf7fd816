//! Signup record entity.

use chrono::{DateTime, Utc};

/// Timestamp layout written alongside the email by stores that keep one.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An accepted signup.
///
/// `email` is already trimmed and validated. `accepted_at` is only persisted
/// by stores that have a column for it; the flat file keeps the email alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRecord {
    pub email: String,
    pub accepted_at: DateTime<Utc>,
}

impl SignupRecord {
    /// Creates a record stamped with the current time.
    pub fn new(email: impl Into<String>) -> Self {
        Self::with_timestamp(email, Utc::now())
    }

    pub fn with_timestamp(email: impl Into<String>, accepted_at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            accepted_at,
        }
    }

    /// Formats `accepted_at` as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn formatted_timestamp(&self) -> String {
        self.accepted_at.format(TIMESTAMP_FORMAT).to_string()
    }
}
