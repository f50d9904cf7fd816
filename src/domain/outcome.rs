//! Terminal states of a signup submission.
//!
//! Every outcome maps to exactly one user-facing message and one
//! [`FlashLevel`]. Raw error details never reach this type.

use serde::{Deserialize, Serialize};

/// Severity class of a one-shot status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

impl FlashLevel {
    /// CSS class suffix used by the form template.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Whether the confirmation email went out for an accepted signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Confirmed,
    Unconfirmed,
}

/// Why a submission was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    InvalidFormat,
    Duplicate,
    StoreError,
}

/// Result of running the signup workflow once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Accepted(Delivery),
    Rejected(Rejection),
}

impl SignupOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn level(&self) -> FlashLevel {
        match self {
            Self::Accepted(Delivery::Confirmed) => FlashLevel::Success,
            Self::Accepted(Delivery::Unconfirmed) => FlashLevel::Warning,
            Self::Rejected(Rejection::Duplicate) => FlashLevel::Warning,
            Self::Rejected(Rejection::Empty)
            | Self::Rejected(Rejection::InvalidFormat)
            | Self::Rejected(Rejection::StoreError) => FlashLevel::Danger,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Accepted(Delivery::Confirmed) => {
                "Success! You're signed up for weekly updates. Check your inbox for a confirmation!"
            }
            Self::Accepted(Delivery::Unconfirmed) => {
                "Your email was saved, but we couldn't send a confirmation. We'll be in touch!"
            }
            Self::Rejected(Rejection::Empty) => "Email address cannot be empty.",
            Self::Rejected(Rejection::InvalidFormat) => "Please enter a valid email address.",
            Self::Rejected(Rejection::Duplicate) => "You're already registered for updates!",
            Self::Rejected(Rejection::StoreError) => {
                "A server error occurred. Please try again later."
            }
        }
    }

    /// Stable label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted(Delivery::Confirmed) => "confirmed",
            Self::Accepted(Delivery::Unconfirmed) => "unconfirmed",
            Self::Rejected(Rejection::Empty) => "empty",
            Self::Rejected(Rejection::InvalidFormat) => "invalid_format",
            Self::Rejected(Rejection::Duplicate) => "duplicate",
            Self::Rejected(Rejection::StoreError) => "store_error",
        }
    }
}
