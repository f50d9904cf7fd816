//! Application layer orchestrating the signup workflow.
//!
//! Services coordinate the validator, the duplicate store and the notifier
//! without knowing which concrete backends are active.
//!
//! # Services
//!
//! - [`services::SignupService`] - Validate, check duplicates, persist, notify

pub mod services;
