//! Service-account key decoding and access token minting.

use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// OAuth2 scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Errors from decoding credentials or obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Credential bundle is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Credential bundle is not a valid service-account key: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint rejected the assertion ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// The parts of a Google service-account JSON key this service needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"***")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Decodes a key from its base64 (standard alphabet) representation.
    ///
    /// Surrounding whitespace in `encoded` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Base64`] or [`CredentialsError::Json`] if
    /// the bundle cannot be decoded.
    pub fn from_base64(encoded: &str) -> Result<Self, CredentialsError> {
        let raw = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Mints and caches OAuth2 access tokens for one service account.
///
/// A token is reused until shortly before it expires. Concurrent callers
/// share one refresh.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scope: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, scope: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            key,
            scope: scope.into(),
            http,
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a valid access token, fetching a new one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] if the assertion cannot be signed, the
    /// token endpoint is unreachable, or it rejects the assertion.
    pub async fn access_token(&self) -> Result<String, CredentialsError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);

        Ok(value)
    }

    fn sign_assertion(&self) -> Result<String, CredentialsError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }

    async fn fetch_token(&self) -> Result<CachedToken, CredentialsError> {
        let assertion = self.sign_assertion()?;
        debug!("Requesting access token for {}", self.key.client_email);

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialsError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        info!(
            "Obtained access token for {} (expires in {}s)",
            self.key.client_email, token.expires_in
        );

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);

        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_PEM: &str = include_str!("../../../tests/fixtures/test_service_account_key.pem");

    fn encode_bundle(json: &serde_json::Value) -> String {
        base64::engine::general_purpose::STANDARD.encode(json.to_string())
    }

    fn test_key() -> ServiceAccountKey {
        ServiceAccountKey {
            client_email: "signup@test-project.iam.gserviceaccount.com".to_string(),
            private_key: TEST_KEY_PEM.to_string(),
            token_uri: "https://oauth2.example.test/token".to_string(),
        }
    }

    #[test]
    fn test_from_base64_reads_key_fields() {
        let bundle = encode_bundle(&serde_json::json!({
            "type": "service_account",
            "client_email": "svc@example.iam.gserviceaccount.com",
            "private_key": "PEM",
            "token_uri": "https://oauth2.example.test/token",
        }));

        let key = ServiceAccountKey::from_base64(&format!("  {bundle}\n")).unwrap();

        assert_eq!(key.client_email, "svc@example.iam.gserviceaccount.com");
        assert_eq!(key.token_uri, "https://oauth2.example.test/token");
    }

    #[test]
    fn test_from_base64_defaults_token_uri() {
        let bundle = encode_bundle(&serde_json::json!({
            "client_email": "svc@example.iam.gserviceaccount.com",
            "private_key": "PEM",
        }));

        let key = ServiceAccountKey::from_base64(&bundle).unwrap();

        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        assert!(matches!(
            ServiceAccountKey::from_base64("not base64!!"),
            Err(CredentialsError::Base64(_))
        ));

        let not_json = base64::engine::general_purpose::STANDARD.encode("plain text");
        assert!(matches!(
            ServiceAccountKey::from_base64(&not_json),
            Err(CredentialsError::Json(_))
        ));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let rendered = format!("{:?}", test_key());
        assert!(!rendered.contains("BEGIN PRIVATE KEY"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_sign_assertion_claims() {
        #[derive(Deserialize)]
        struct Decoded {
            iss: String,
            scope: String,
            aud: String,
            iat: i64,
            exp: i64,
        }

        let auth = ServiceAccountAuth::new(test_key(), SHEETS_SCOPE, reqwest::Client::new());
        let jwt = auth.sign_assertion().unwrap();

        let header = jsonwebtoken::decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);

        let payload = jwt.split('.').nth(1).unwrap();
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .unwrap();
        let decoded: Decoded = serde_json::from_slice(&raw).unwrap();

        assert_eq!(decoded.iss, auth.client_email());
        assert_eq!(decoded.scope, SHEETS_SCOPE);
        assert_eq!(decoded.aud, "https://oauth2.example.test/token");
        assert_eq!(decoded.exp - decoded.iat, ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn test_sign_assertion_rejects_bad_pem() {
        let mut key = test_key();
        key.private_key = "not a pem".to_string();
        let auth = ServiceAccountAuth::new(key, SHEETS_SCOPE, reqwest::Client::new());

        assert!(matches!(
            auth.sign_assertion(),
            Err(CredentialsError::Signing(_))
        ));
    }
}
