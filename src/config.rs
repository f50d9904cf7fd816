//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and passed by value into
//! the components that need it. Nothing reads the environment after startup.
//!
//! ## Required Variables
//!
//! - `SECRET_KEY` - HMAC key for flash-message and CSRF cookies
//!   (`FLASK_SECRET_KEY` is accepted as an alias)
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:5000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Read client IP from forwarding headers (default: `false`)
//! - `SITE_NAME` - Name used in the page title and confirmation email
//! - `STATIC_DIR` - Directory served under `/static` (default: `static`)
//!
//! ### Storage
//!
//! - `STORE_BACKEND` - `file` (default) or `sheets`
//! - `EMAIL_FILE` - Path of the signup file (default: `emails.txt`)
//! - `SHEET_ID` - Spreadsheet identifier (sheets backend)
//! - `GOOGLE_CREDENTIALS_B64` - Base64 service-account key (sheets backend)
//! - `SHEET_NAME` - Worksheet name (default: `Sheet1`)
//! - `SHEETS_API_BASE` - API base URL (default: `https://sheets.googleapis.com`)
//!
//! Missing sheet settings do not stop the server; the store reports an error
//! on every submission instead.
//!
//! ### Mail
//!
//! - `SMTP_HOST` (default: `smtp.gmail.com`), `SMTP_PORT` (default: `465`)
//! - `SMTP_SECURITY` - `tls`, `starttls` or `none` (default: `tls`)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD` (aliases: `GMAIL_USER` / `GMAIL_APP_PASSWORD`)
//! - `MAIL_FROM` - Sender address (default: the SMTP username)
//!
//! Missing credentials do not stop the server; confirmations are not sent.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::infrastructure::mail::{SmtpSecurity, SmtpSettings};

const DEFAULT_SITE_NAME: &str = "The Genesis Engine Meetup";
const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

/// Which duplicate store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Sheets,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "sheets" | "spreadsheet" => Some(Self::Sheets),
            _ => None,
        }
    }
}

/// Spreadsheet settings. Both identifiers may be absent.
#[derive(Clone)]
pub struct SheetsConfig {
    pub sheet_id: Option<String>,
    pub credentials_b64: Option<String>,
    pub sheet_name: String,
    pub api_base: String,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("sheet_id", &self.sheet_id)
            .field(
                "credentials_b64",
                &self.credentials_b64.as_ref().map(|_| "***"),
            )
            .field("sheet_name", &self.sheet_name)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// SMTP relay settings. Credentials may be absent.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_security", &self.smtp_security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from", &self.from)
            .finish()
    }
}

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Signing key for flash-message and CSRF cookies.
    pub secret_key: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub site_name: String,
    pub static_dir: PathBuf,
    pub store_backend: StoreBackend,
    pub email_file: PathBuf,
    pub sheets: SheetsConfig,
    pub mail: MailConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"***")
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("behind_proxy", &self.behind_proxy)
            .field("site_name", &self.site_name)
            .field("static_dir", &self.static_dir)
            .field("store_backend", &self.store_backend)
            .field("email_file", &self.email_file)
            .field("sheets", &self.sheets)
            .field("mail", &self.mail)
            .finish()
    }
}

/// Reads the first non-empty variable among `names`.
fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_KEY` is missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let secret_key = first_var(&["SECRET_KEY", "FLASK_SECRET_KEY"])
            .context("SECRET_KEY must be set")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let site_name = first_var(&["SITE_NAME"]).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value).with_context(|| {
                format!("STORE_BACKEND must be 'file' or 'sheets', got '{}'", value)
            })?,
            Err(_) => StoreBackend::File,
        };

        let email_file = env::var("EMAIL_FILE").unwrap_or_else(|_| "emails.txt".to_string());

        let sheets = SheetsConfig {
            sheet_id: first_var(&["SHEET_ID"]),
            credentials_b64: first_var(&["GOOGLE_CREDENTIALS_B64"]),
            sheet_name: first_var(&["SHEET_NAME"]).unwrap_or_else(|| "Sheet1".to_string()),
            api_base: first_var(&["SHEETS_API_BASE"])
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
        };

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("SMTP_PORT must be a port number, got '{}'", value))?,
            Err(_) => 465,
        };

        let smtp_security = match env::var("SMTP_SECURITY") {
            Ok(value) => SmtpSecurity::parse(&value).with_context(|| {
                format!(
                    "SMTP_SECURITY must be 'tls', 'starttls' or 'none', got '{}'",
                    value
                )
            })?,
            Err(_) => SmtpSecurity::Tls,
        };

        let mail = MailConfig {
            smtp_host: first_var(&["SMTP_HOST"]).unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_port,
            smtp_security,
            username: first_var(&["SMTP_USERNAME", "GMAIL_USER"]),
            password: first_var(&["SMTP_PASSWORD", "GMAIL_APP_PASSWORD"]),
            from: first_var(&["MAIL_FROM"]),
        };

        Ok(Self {
            secret_key,
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            site_name,
            static_dir: PathBuf::from(static_dir),
            store_backend,
            email_file: PathBuf::from(email_file),
            sheets,
            mail,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `secret_key` is empty
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `SHEETS_API_BASE` is not an http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let api_base = url::Url::parse(&self.sheets.api_base)
            .with_context(|| format!("SHEETS_API_BASE is not a valid URL: '{}'", self.sheets.api_base))?;
        if api_base.scheme() != "http" && api_base.scheme() != "https" {
            anyhow::bail!(
                "SHEETS_API_BASE must start with 'http://' or 'https://', got '{}'",
                self.sheets.api_base
            );
        }

        if self.email_file.as_os_str().is_empty() {
            anyhow::bail!("EMAIL_FILE must not be empty");
        }

        Ok(())
    }

    /// Returns SMTP settings when both username and password are present.
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let (username, password) = match (&self.mail.username, &self.mail.password) {
            (Some(username), Some(password)) => (username.clone(), password.clone()),
            _ => return None,
        };

        Some(SmtpSettings {
            host: self.mail.smtp_host.clone(),
            port: self.mail.smtp_port,
            security: self.mail.smtp_security,
            username,
            password,
            from: self.mail.from.clone(),
            site_name: self.site_name.clone(),
        })
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        match self.store_backend {
            StoreBackend::File => {
                tracing::info!("  Store: file ({})", self.email_file.display());
            }
            StoreBackend::Sheets => tracing::info!(
                "  Store: sheets (id: {}, sheet: {}, credentials: {})",
                self.sheets.sheet_id.as_deref().unwrap_or("<missing>"),
                self.sheets.sheet_name,
                if self.sheets.credentials_b64.is_some() {
                    "set"
                } else {
                    "missing"
                }
            ),
        }

        match &self.mail.username {
            Some(username) if self.mail.password.is_some() => tracing::info!(
                "  Mail: {}:{} as {}",
                self.mail.smtp_host,
                self.mail.smtp_port,
                mask_email(username)
            ),
            _ => tracing::info!("  Mail: disabled (no credentials)"),
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks the local part of an address for logging.
///
/// `alice@example.com` → `a***@example.com`
fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "SECRET_KEY",
        "FLASK_SECRET_KEY",
        "STORE_BACKEND",
        "SMTP_PORT",
        "SMTP_SECURITY",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "GMAIL_USER",
        "GMAIL_APP_PASSWORD",
        "SHEET_ID",
    ];

    fn clear_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn test_config() -> Config {
        Config {
            secret_key: "test-secret".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            site_name: DEFAULT_SITE_NAME.to_string(),
            static_dir: PathBuf::from("static"),
            store_backend: StoreBackend::File,
            email_file: PathBuf::from("emails.txt"),
            sheets: SheetsConfig {
                sheet_id: None,
                credentials_b64: None,
                sheet_name: "Sheet1".to_string(),
                api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            },
            mail: MailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 465,
                smtp_security: SmtpSecurity::Tls,
                username: None,
                password: None,
                from: None,
            },
        }
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "5000".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:5000".to_string();
        config.sheets.api_base = "ftp://sheets.example.com".to_string();
        assert!(config.validate().is_err());

        config.sheets.api_base = DEFAULT_SHEETS_API_BASE.to_string();
        config.secret_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_smtp_settings_require_both_credentials() {
        let mut config = test_config();
        assert!(config.smtp_settings().is_none());

        config.mail.username = Some("sender@example.com".to_string());
        assert!(config.smtp_settings().is_none());

        config.mail.password = Some("app-password".to_string());
        let settings = config.smtp_settings().unwrap();
        assert_eq!(settings.username, "sender@example.com");
        assert_eq!(settings.port, 465);
        assert_eq!(settings.site_name, DEFAULT_SITE_NAME);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = test_config();
        config.mail.password = Some("super-secret-password".to_string());
        config.sheets.credentials_b64 = Some("c2VjcmV0".to_string());

        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("test-secret"));
        assert!(!rendered.contains("super-secret-password"));
        assert!(!rendered.contains("c2VjcmV0"));
    }

    #[test]
    #[serial]
    fn test_missing_secret_key_is_fatal() {
        clear_env();

        let result = Config::from_env();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SECRET_KEY"));
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("SECRET_KEY", "s3cret");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.store_backend, StoreBackend::File);
        assert_eq!(config.email_file, PathBuf::from("emails.txt"));
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.smtp_port, 465);
        assert_eq!(config.mail.smtp_security, SmtpSecurity::Tls);
        assert!(config.smtp_settings().is_none());
        assert!(config.sheets.sheet_id.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_legacy_variable_aliases() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("FLASK_SECRET_KEY", "legacy-secret");
            env::set_var("GMAIL_USER", "sender@gmail.com");
            env::set_var("GMAIL_APP_PASSWORD", "abcd efgh");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.secret_key, "legacy-secret");
        assert_eq!(config.mail.username.as_deref(), Some("sender@gmail.com"));
        assert!(config.smtp_settings().is_some());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_backend_and_port() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("SECRET_KEY", "s3cret");
            env::set_var("STORE_BACKEND", "postgres");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::set_var("STORE_BACKEND", "sheets");
            env::set_var("SMTP_PORT", "not-a-port");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::set_var("SMTP_PORT", "587");
            env::set_var("SMTP_SECURITY", "starttls");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.store_backend, StoreBackend::Sheets);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.smtp_security, SmtpSecurity::StartTls);

        clear_env();
    }
}
