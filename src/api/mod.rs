//! JSON and cross-cutting HTTP layer.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - Health endpoint
//! - [`middleware`] - Rate limiting and request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
