//! Flat-file implementation of the signup repository.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::entities::SignupRecord;
use crate::domain::repositories::{SignupRepository, StoreError};

/// Append-only text file holding one email per line.
///
/// No header, no locking. A missing file is treated as an empty store and is
/// created on the first append. Each `contains` call reads the whole file.
pub struct FileSignupRepository {
    path: PathBuf,
}

impl FileSignupRepository {
    /// Creates a repository backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every non-blank line, trimmed.
    async fn read_emails(&self) -> Result<Vec<String>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Signup file {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[async_trait]
impl SignupRepository for FileSignupRepository {
    async fn contains(&self, email: &str) -> Result<bool, StoreError> {
        let emails = self.read_emails().await?;
        Ok(emails.iter().any(|stored| stored == email))
    }

    async fn append(&self, record: &SignupRecord) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(format!("{}\n", record.email.trim()).as_bytes())
            .await?;
        file.flush().await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.read_emails().await
    }
}
