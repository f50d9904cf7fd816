//! Signup page route configuration.

use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::state::AppState;
use crate::web::handlers::{index_handler, submit_handler};
use axum::{
    Router,
    routing::{get, post},
};

/// Signup page routes.
///
/// Only submissions are rate limited; rendering the form is not.
///
/// # Endpoints
///
/// - `GET  /` - Signup form with any pending status message
/// - `POST /` - Run the signup workflow and redirect back to the form
pub fn signup_routes(limit: RateLimit) -> Router<AppState> {
    let submit = match limit {
        RateLimit::Disabled => post(submit_handler),
        RateLimit::PeerIp => post(submit_handler).layer(rate_limit::layer()),
        RateLimit::Proxied => post(submit_handler).layer(rate_limit::proxied_layer()),
    };

    Router::new().route("/", get(index_handler).merge(submit))
}
