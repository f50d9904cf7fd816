//! Repository used when the configured backend cannot be constructed.

use async_trait::async_trait;

use crate::domain::entities::SignupRecord;
use crate::domain::repositories::{SignupRepository, StoreError};

/// A store whose every operation fails.
///
/// Selected at startup when the spreadsheet backend is chosen but its
/// identifier or credentials are missing or unreadable. The server still
/// starts; every submission ends as a store error.
pub struct UnavailableSignupRepository {
    reason: String,
}

impl UnavailableSignupRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl SignupRepository for UnavailableSignupRepository {
    async fn contains(&self, _email: &str) -> Result<bool, StoreError> {
        Err(self.error())
    }

    async fn append(&self, _record: &SignupRecord) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_operation_fails() {
        let repo = UnavailableSignupRepository::new("SHEET_ID is not set");

        assert!(matches!(
            repo.contains("a@b.co").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(repo.append(&SignupRecord::new("a@b.co")).await.is_err());
        assert!(repo.list().await.is_err());
    }

    #[tokio::test]
    async fn test_error_carries_reason() {
        let repo = UnavailableSignupRepository::new("SHEET_ID is not set");
        let err = repo.contains("a@b.co").await.unwrap_err();

        assert!(err.to_string().contains("SHEET_ID is not set"));
    }
}
