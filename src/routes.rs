//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Signup form (public)
//! - `POST /`          - Signup submission (CSRF token required, rate limited)
//! - `GET  /health`    - Health check: store and notifier
//! - `/static/*`       - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on submissions
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit::RateLimit, tracing};
use crate::state::AppState;
use crate::web::routes::signup_routes;
use axum::Router;
use axum::routing::get;
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limit` - rate limiting mode for form submissions
/// - `static_dir` - directory served under `/static`
pub fn router(state: AppState, limit: RateLimit, static_dir: &Path) -> Router {
    Router::new()
        .merge(signup_routes(limit))
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(tracing::layer())
}

/// [`router`] wrapped so that `/health/` and `/health` are the same route.
///
/// Path normalization has to run before routing, so it wraps the router
/// instead of being added as a layer.
pub fn app_router(state: AppState, limit: RateLimit, static_dir: &Path) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, limit, static_dir))
}
