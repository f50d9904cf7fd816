//! Business logic services for the application layer.

pub mod signup_service;

pub use signup_service::SignupService;
