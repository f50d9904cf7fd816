//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: The duplicate store answered
/// - **503 Service Unavailable**: The duplicate store could not be read
///
/// # Components Checked
///
/// 1. **Store**: Reads the stored signups and reports their count
/// 2. **Notifier**: Reports whether relay credentials are configured; the relay
///    itself is not contacted, and a disabled notifier does not degrade status
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Reachable, 42 signups" },
///     "notifier": { "status": "configured", "message": "SMTP credentials configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let notifier_check = check_notifier(&state);

    let healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            notifier: notifier_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    match state.signup_service.signup_count().await {
        Ok(count) => CheckStatus::new("ok", format!("Reachable, {} signups", count)),
        Err(e) => {
            tracing::warn!("Health check: store error: {}", e);
            CheckStatus::new("error", "Store unavailable")
        }
    }
}

fn check_notifier(state: &AppState) -> CheckStatus {
    if state.signup_service.notifier_configured() {
        CheckStatus::new("configured", "SMTP credentials configured")
    } else {
        CheckStatus::new("disabled", "SMTP credentials not set; confirmations are not sent")
    }
}
