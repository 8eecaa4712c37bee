//! Route inspection controller.

use axum::{
    Json,
    response::{IntoResponse, Response},
};

use crate::api::dto::route_info::RouteInfoResponse;
use crate::domain::entities::RouteMatch;
use crate::error::AppError;
use crate::state::AppState;

/// Reports which controller the captured path would dispatch to.
///
/// `/_route/check/x` describes the dispatch of `/check/x`. A bare `/_route`
/// has no path to dispatch and is rejected with 400.
pub fn route_info_controller(
    state: &AppState,
    route_match: &RouteMatch,
) -> Result<Response, AppError> {
    let path = route_match.capture(0).unwrap_or_default();
    let inner = state.routes.dispatch(path)?;

    Ok(Json(RouteInfoResponse::new(path, inner)).into_response())
}
