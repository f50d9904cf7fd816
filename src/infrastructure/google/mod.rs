//! Google API authentication.
//!
//! Service-account OAuth2 flow used by the spreadsheet-backed store:
//! a base64-encoded JSON key is decoded at startup, and short-lived access
//! tokens are minted by exchanging a signed JWT at the key's token endpoint.

mod service_account;

pub use service_account::{CredentialsError, ServiceAccountAuth, ServiceAccountKey, SHEETS_SCOPE};
