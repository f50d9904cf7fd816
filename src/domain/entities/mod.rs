//! Core domain entities.
//!
//! The service has a single entity, [`SignupRecord`]: one accepted email
//! address. Records are created once and never updated or deleted.

pub mod signup;

pub use signup::SignupRecord;
