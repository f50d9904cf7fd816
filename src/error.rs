//! Errors surfaced at the HTTP boundary.
//!
//! Workflow failures never become `AppError`s: they are turned into flash
//! messages by [`crate::application::services::SignupService`]. This type covers
//! what is left, such as a rejected CSRF token or a failure to sign a cookie.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server error occurred. Please try again later.",
                )
                    .into_response()
            }
        }
    }
}
