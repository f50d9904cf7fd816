//! # Signup Form
//!
//! A single-page email signup form built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Signup record, outcomes, and the store trait
//! - **Application Layer** ([`application`]) - The signup workflow
//! - **Infrastructure Layer** ([`infrastructure`]) - File and Google Sheets stores, SMTP
//! - **API Layer** ([`api`]) - Health endpoint and HTTP middleware
//! - **Web Layer** ([`web`]) - The HTML form, flash messages, and CSRF protection
//!
//! ## Signup Flow
//!
//! `POST /` → trim → validate → duplicate check → append → confirmation email →
//! one-shot status message → redirect to `GET /`.
//!
//! ## Quick Start
//!
//! ```bash
//! export SECRET_KEY="change-me"
//! export SMTP_USERNAME="sender@gmail.com"     # Optional
//! export SMTP_PASSWORD="app-password"         # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::SignupService;
    pub use crate::domain::entities::SignupRecord;
    pub use crate::domain::outcome::{Delivery, FlashLevel, Rejection, SignupOutcome};
    pub use crate::domain::repositories::{SignupRepository, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::mail::Notifier;
    pub use crate::state::AppState;
}
