//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces the workflow depends on.
//!
//! # Modules
//!
//! - [`google`] - Service-account authentication for Google APIs
//! - [`mail`] - Confirmation email over SMTP
//! - [`persistence`] - Duplicate store backends (file, Google Sheets)

pub mod google;
pub mod mail;
pub mod persistence;
