//! Signed cookies for one-shot flash messages and CSRF tokens.
//!
//! Both cookies carry `payload.signature`, where the signature is the
//! hex-encoded HMAC-SHA256 of the payload keyed by `SECRET_KEY`. Cookies with
//! a missing or wrong signature are ignored.
//!
//! # Cookie Format
//!
//! ```text
//! flash=<base64url(json {level, message})>.<hex hmac>
//! csrf_token=<base64url(32 random bytes)>.<hex hmac>
//! ```

use axum::http::{HeaderMap, header::COOKIE};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::outcome::{FlashLevel, SignupOutcome};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "flash";
pub const CSRF_COOKIE: &str = "csrf_token";

const CSRF_TOKEN_BYTES: usize = 32;
const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// A one-shot status message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl From<SignupOutcome> for Flash {
    fn from(outcome: SignupOutcome) -> Self {
        Self {
            level: outcome.level(),
            message: outcome.message().to_string(),
        }
    }
}

/// Signs and verifies cookie payloads with the server secret.
pub struct SessionSigner {
    key: Vec<u8>,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac
    }

    /// Returns `payload.signature`.
    pub fn sign(&self, payload: &str) -> String {
        let signature = hex::encode(self.mac(payload).finalize().into_bytes());
        format!("{}.{}", payload, signature)
    }

    /// Returns the payload of a correctly signed value.
    ///
    /// Signature comparison is constant-time.
    pub fn verify<'a>(&self, signed: &'a str) -> Option<&'a str> {
        let (payload, signature) = signed.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.mac(payload).verify_slice(&signature).ok()?;
        Some(payload)
    }

    /// Builds the `Set-Cookie` value carrying `flash`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the message cannot be serialized.
    pub fn flash_cookie(&self, flash: &Flash) -> Result<String, AppError> {
        let json = serde_json::to_vec(flash)
            .map_err(|e| AppError::internal(format!("Failed to encode flash message: {}", e)))?;
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json);

        Ok(format!(
            "{}={}; {}",
            FLASH_COOKIE,
            self.sign(&payload),
            COOKIE_ATTRIBUTES
        ))
    }

    /// Reads and verifies the flash cookie from request headers.
    pub fn read_flash(&self, headers: &HeaderMap) -> Option<Flash> {
        let signed = cookie_value(headers, FLASH_COOKIE)?;
        let payload = self.verify(signed)?;
        let json = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Builds the `Set-Cookie` value carrying a CSRF token.
    pub fn csrf_cookie(&self, token: &str) -> String {
        format!("{}={}; {}", CSRF_COOKIE, self.sign(token), COOKIE_ATTRIBUTES)
    }

    /// Returns the token stored in a correctly signed CSRF cookie.
    pub fn read_csrf(&self, headers: &HeaderMap) -> Option<String> {
        let signed = cookie_value(headers, CSRF_COOKIE)?;
        self.verify(signed).map(str::to_string)
    }

    /// Checks a submitted form token against the signed CSRF cookie.
    ///
    /// Both must be present, the cookie signature must verify, and the
    /// submitted token must equal the cookie token.
    pub fn csrf_matches(&self, headers: &HeaderMap, submitted: &str) -> bool {
        if submitted.is_empty() {
            return false;
        }
        let Some(signed) = cookie_value(headers, CSRF_COOKIE) else {
            return false;
        };
        let Some((_, signature)) = signed.rsplit_once('.') else {
            return false;
        };
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        // The cookie signature must be valid for the submitted token.
        self.mac(submitted).verify_slice(&signature).is_ok()
    }
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_flash_cookie() -> String {
    format!("{}=; Max-Age=0; {}", FLASH_COOKIE, COOKIE_ATTRIBUTES)
}

/// Generates a fresh random CSRF token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn new_csrf_token() -> Result<String, AppError> {
    let mut buffer = [0u8; CSRF_TOKEN_BYTES];
    getrandom::fill(&mut buffer)
        .map_err(|e| AppError::internal(format!("Failed to generate CSRF token: {}", e)))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Finds a cookie by name across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value),
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::{Delivery, Rejection};
    use axum::http::HeaderValue;

    fn signer() -> SessionSigner {
        SessionSigner::new("test-secret")
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    /// Strips attributes from a `Set-Cookie` value, leaving `name=value`.
    fn as_request_cookie(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_sign_and_verify() {
        let signed = signer().sign("payload");

        assert_eq!(signer().verify(&signed), Some("payload"));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let signed = signer().sign("payload");
        let tampered = signed.replacen("payload", "pay1oad", 1);

        assert_eq!(signer().verify(&tampered), None);
        assert_eq!(signer().verify("payload"), None);
        assert_eq!(signer().verify("payload.zz"), None);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let signed = SessionSigner::new("other-secret").sign("payload");

        assert_eq!(signer().verify(&signed), None);
    }

    #[test]
    fn test_flash_round_trip_through_cookie() {
        let flash = Flash::from(SignupOutcome::Rejected(Rejection::Duplicate));
        let set_cookie = signer().flash_cookie(&flash).unwrap();

        assert!(set_cookie.contains("HttpOnly"));

        let headers = headers_with_cookie(&as_request_cookie(&set_cookie));
        let read = signer().read_flash(&headers).unwrap();

        assert_eq!(read.level, FlashLevel::Warning);
        assert_eq!(read.message, "You're already registered for updates!");
    }

    #[test]
    fn test_flash_from_outcome() {
        let flash = Flash::from(SignupOutcome::Accepted(Delivery::Confirmed));

        assert_eq!(flash.level, FlashLevel::Success);
        assert!(flash.message.starts_with("Success!"));
    }

    #[test]
    fn test_forged_flash_is_ignored() {
        let headers = headers_with_cookie("flash=eyJsZXZlbCI6InN1Y2Nlc3MifQ.deadbeef");

        assert!(signer().read_flash(&headers).is_none());
    }

    #[test]
    fn test_clear_flash_cookie_expires() {
        assert!(clear_flash_cookie().starts_with("flash=;"));
        assert!(clear_flash_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_csrf_token_is_random_and_url_safe() {
        let a = new_csrf_token().unwrap();
        let b = new_csrf_token().unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_csrf_matches() {
        let token = new_csrf_token().unwrap();
        let cookie = as_request_cookie(&signer().csrf_cookie(&token));
        let headers = headers_with_cookie(&format!("other=1; {}", cookie));

        assert_eq!(signer().read_csrf(&headers).as_deref(), Some(token.as_str()));
        assert!(signer().csrf_matches(&headers, &token));
        assert!(!signer().csrf_matches(&headers, "wrong-token"));
        assert!(!signer().csrf_matches(&headers, ""));
    }

    #[test]
    fn test_csrf_rejects_missing_or_foreign_cookie() {
        let token = new_csrf_token().unwrap();

        assert!(!signer().csrf_matches(&HeaderMap::new(), &token));

        let foreign = as_request_cookie(&SessionSigner::new("other").csrf_cookie(&token));
        assert!(!signer().csrf_matches(&headers_with_cookie(&foreign), &token));
    }

    #[test]
    fn test_cookie_value_parsing() {
        let headers = headers_with_cookie("a=1; flash=abc.def;b=2");

        assert_eq!(cookie_value(&headers, "flash"), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "b"), Some("2"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
