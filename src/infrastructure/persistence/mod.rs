//! Duplicate store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::SignupRepository`].
//! Exactly one is selected at startup by [`crate::server::build_repository`].
//!
//! # Repositories
//!
//! - [`FileSignupRepository`] - One email per line in a local text file
//! - [`SheetsSignupRepository`] - Rows of `[timestamp, email]` in a Google Sheet
//! - [`UnavailableSignupRepository`] - Always errors; used when the sheet is misconfigured

pub mod file_signup_repository;
pub mod sheets_signup_repository;
pub mod unavailable_signup_repository;

pub use file_signup_repository::FileSignupRepository;
pub use sheets_signup_repository::{SheetLocation, SheetsSignupRepository};
pub use unavailable_signup_repository::UnavailableSignupRepository;
