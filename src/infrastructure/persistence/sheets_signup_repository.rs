//! Google Sheets implementation of the signup repository.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

use crate::domain::entities::SignupRecord;
use crate::domain::repositories::{SignupRepository, StoreError};
use crate::infrastructure::google::ServiceAccountAuth;

/// Column holding emails; column A holds the acceptance timestamp.
const EMAIL_COLUMN: &str = "B";

/// Location of the signup sheet.
#[derive(Debug, Clone)]
pub struct SheetLocation {
    /// Base URL of the Sheets API, e.g. `https://sheets.googleapis.com`.
    pub api_base: Url,
    pub spreadsheet_id: String,
    /// Worksheet (tab) name, e.g. `Sheet1`.
    pub sheet_name: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Stores signups as `[timestamp, email]` rows in a Google Sheet.
///
/// Every call goes over the network with a service-account access token.
/// Auth, network, quota and decoding failures all surface as [`StoreError`].
pub struct SheetsSignupRepository {
    location: SheetLocation,
    auth: Arc<ServiceAccountAuth>,
    http: reqwest::Client,
}

impl SheetsSignupRepository {
    pub fn new(location: SheetLocation, auth: Arc<ServiceAccountAuth>, http: reqwest::Client) -> Self {
        Self {
            location,
            auth,
            http,
        }
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{range}{suffix}`.
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
        let mut url = self.location.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("SHEETS_API_BASE cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.location.spreadsheet_id.as_str(), "values"])
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    fn email_range(&self) -> String {
        format!(
            "{}!{col}:{col}",
            self.location.sheet_name,
            col = EMAIL_COLUMN
        )
    }

    fn row_range(&self) -> String {
        format!("{}!A:{}", self.location.sheet_name, EMAIL_COLUMN)
    }

    async fn token(&self) -> Result<String, StoreError> {
        self.auth.access_token().await.map_err(|e| {
            error!("Sheets authentication failed: {}", e);
            StoreError::Auth(e.to_string())
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(format!("{}: {}", status, body)))
    }
}

fn remote_error(e: reqwest::Error) -> StoreError {
    StoreError::Remote(e.to_string())
}

#[async_trait]
impl SignupRepository for SheetsSignupRepository {
    async fn contains(&self, email: &str) -> Result<bool, StoreError> {
        let emails = self.list().await?;
        Ok(emails.iter().any(|stored| stored == email))
    }

    async fn append(&self, record: &SignupRecord) -> Result<(), StoreError> {
        let token = self.token().await?;
        let mut url = self.values_url(&self.row_range(), ":append")?;
        // RAW stores both cells as literal strings; a leading `+`, `-` or `=`
        // in an address is never parsed as a formula.
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = json!({
            "values": [[record.formatted_timestamp(), record.email]],
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(remote_error)?;
        Self::check_status(response).await?;

        debug!("Appended row to sheet {}", self.location.sheet_name);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let token = self.token().await?;
        let url = self.values_url(&self.email_range(), "")?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(remote_error)?;
        let response = Self::check_status(response).await?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(range
            .values
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|cell| cell.trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect())
    }
}
