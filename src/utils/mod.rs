//! Utility functions shared across layers.
//!
//! - [`email_validator`] - Email normalization and shape validation

pub mod email_validator;
