//! Health controller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with component checks.
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Backing store unreachable
///
/// Reputation checks being unconfigured is reported as `disabled` and does
/// not degrade the service.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "cache": { "status": "ok", "message": "redis store reachable" },
///     "reputation": { "status": "ok", "message": "Safe Browsing configured" },
///     "routes": { "status": "ok", "message": "4 routes loaded" }
///   }
/// }
/// ```
pub async fn health_controller(state: &AppState) -> Response {
    let checks = HealthChecks {
        cache: check_cache(state).await,
        reputation: check_reputation(state),
        routes: check_routes(state),
    };

    let all_healthy =
        checks.cache.is_healthy() && checks.reputation.is_healthy() && checks.routes.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Json(response).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();
    if backend == "disabled" {
        CheckStatus::new("disabled", "Caching disabled")
    } else if state.cache.health_check().await {
        CheckStatus::new("ok", format!("{} store reachable", backend))
    } else {
        CheckStatus::new("error", format!("{} store unreachable", backend))
    }
}

fn check_reputation(state: &AppState) -> CheckStatus {
    match state.reputation_service {
        Some(_) => CheckStatus::new("ok", "Safe Browsing configured"),
        None => CheckStatus::new("disabled", "No Safe Browsing API key"),
    }
}

fn check_routes(state: &AppState) -> CheckStatus {
    CheckStatus::new("ok", format!("{} routes loaded", state.routes.len()))
}
