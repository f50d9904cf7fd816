//! Syntactic email address validation.
//!
//! No DNS or mailbox verification is performed; the check is purely a shape
//! match on `local@domain.tld`.

use regex::Regex;
use std::sync::LazyLock;

/// Local part of letters, digits and `_.+-`, one domain label, then one or
/// more dot-separated labels.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap()
});

/// Trims surrounding whitespace from a submitted address.
pub fn normalize_email(input: &str) -> &str {
    input.trim()
}

/// Returns `true` when `input` has the shape of an email address.
///
/// The input is expected to be trimmed already; surrounding whitespace makes
/// the address invalid.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_email("a@b.co"));
/// assert!(!is_valid_email("a@b"));
/// assert!(!is_valid_email(""));
/// ```
pub fn is_valid_email(input: &str) -> bool {
    !input.is_empty() && EMAIL_REGEX.is_match(input)
}
