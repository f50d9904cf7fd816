//! Repository trait definitions for the domain layer.
//!
//! The duplicate store is the only persistence seam. Implementations live in
//! `crate::infrastructure::persistence` and are selected once at startup, so
//! the signup workflow never knows which backend is active.
//!
//! # Available Repositories
//!
//! - [`SignupRepository`] - Membership check and append-only record storage
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod signup_repository;

pub use signup_repository::{SignupRepository, StoreError};

#[cfg(test)]
pub use signup_repository::MockSignupRepository;
