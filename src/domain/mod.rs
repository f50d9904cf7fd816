//! Domain layer containing the signup model and store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Signup record data structure
//! - [`outcome`] - Terminal states of one signup submission and their messages
//! - [`repositories`] - Duplicate store trait definition
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - The workflow itself lives in [`crate::application::services`]

pub mod entities;
pub mod outcome;
pub mod repositories;
