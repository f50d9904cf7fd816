//! HTML page handlers.

mod signup;

pub use signup::{IndexTemplate, SignupForm, index_handler, submit_handler};
