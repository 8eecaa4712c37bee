//! Reputation controller.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::api::dto::reputation::ReputationResponse;
use crate::config::FailurePolicy;
use crate::domain::computation::ComputationError;
use crate::domain::entities::RouteMatch;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_normalizer::normalize_url;

/// Checks a URL against the reputation service.
///
/// The URL comes from the first capture (`/check/<url>`) or, failing that,
/// from the `url` query parameter. Percent-encoded URLs must use the query
/// parameter since the path is matched undecoded.
///
/// # Response Codes
///
/// - **200 OK**: Verdict, or `unknown` when the upstream failed and the
///   service fails open
/// - **400 Bad Request**: Missing or invalid URL
/// - **503 Service Unavailable**: Checks not configured, or upstream failed
///   and the service fails closed
pub async fn reputation_controller(
    state: &AppState,
    route_match: &RouteMatch,
    query_url: Option<String>,
) -> Result<Response, AppError> {
    let raw_url = route_match
        .capture(0)
        .map(str::to_string)
        .or(query_url)
        .ok_or_else(|| {
            AppError::bad_request(
                "Missing URL",
                json!({ "hint": "use /check/<url> or /check?url=<url>" }),
            )
        })?;

    let service = state.reputation_service.as_ref().ok_or_else(|| {
        AppError::upstream("Reputation checks are not configured", json!({}))
    })?;

    match service.check(&raw_url).await {
        Ok(check) => Ok(Json(ReputationResponse::from(check)).into_response()),
        Err(ComputationError::UpstreamUnavailable(reason))
            if state.failure_policy == FailurePolicy::FailOpen =>
        {
            warn!("Reputation check for {} inconclusive, allowing: {}", raw_url, reason);
            let url = normalize_url(&raw_url).unwrap_or(raw_url);
            Ok(Json(ReputationResponse::unknown(url)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
