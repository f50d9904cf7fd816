//! Web layer for the browser-facing signup page.
//!
//! Uses Askama templates for server-side rendering and signed cookies for
//! one-shot messages and CSRF protection.
//!
//! # Modules
//!
//! - [`handlers`] - Page rendering and form submission
//! - [`routes`] - Page route configuration
//! - [`session`] - Flash message and CSRF cookies

pub mod handlers;
pub mod routes;
pub mod session;
