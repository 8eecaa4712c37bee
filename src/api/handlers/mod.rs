//! Front controller and the controllers it dispatches to.
//!
//! Every request goes through [`front_controller`]. The route table picks a
//! controller id, which maps onto one of the [`Controller`] variants below.

mod health;
mod reputation;
mod route_info;

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::domain::entities::RouteMatch;
use crate::domain::routing::{RouteTable, RoutingError};
use crate::error::AppError;
use crate::infrastructure::metrics::names;
use crate::state::AppState;

pub use health::health_controller;
pub use reputation::reputation_controller;
pub use route_info::route_info_controller;

/// Controllers a route can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Health,
    Reputation,
    RouteInfo,
}

impl Controller {
    pub const ALL: [Controller; 3] = [
        Controller::Health,
        Controller::Reputation,
        Controller::RouteInfo,
    ];

    /// Id used in route tables.
    pub fn id(self) -> &'static str {
        match self {
            Controller::Health => "health",
            Controller::Reputation => "reputation",
            Controller::RouteInfo => "route_info",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Rejects tables that point at controllers this service does not have.
///
/// # Errors
///
/// Returns [`RoutingError::InvalidTable`] naming the first unknown id.
pub fn ensure_known_controllers(table: &RouteTable) -> Result<(), RoutingError> {
    match table
        .routes()
        .find(|r| Controller::from_id(&r.controller_id).is_none())
    {
        Some(route) => Err(RoutingError::InvalidTable(format!(
            "unknown controller '{}' for pattern '{}'",
            route.controller_id,
            route.pattern.as_str()
        ))),
        None => Ok(()),
    }
}

/// Single entry point for all requests.
///
/// # Response Codes
///
/// - **404 Not Found**: No route matches the path
/// - **400 Bad Request**: Empty path
/// - Anything else is decided by the selected controller
///
/// Every response bumps the `status` counter tagged with its code.
pub async fn front_controller(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    let response = match dispatch_path(&state.routes, path) {
        Ok(Some(route_match)) => {
            debug!(
                "Dispatching {} to '{}' with {:?}",
                path, route_match.controller_id, route_match.captures
            );
            run_controller(&state, &route_match, &uri).await
        }
        Ok(None) => {
            AppError::not_found("No route matches the request path", json!({ "path": path }))
                .into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    };

    let code = response.status().as_u16().to_string();
    state
        .metrics
        .increment_counter(names::RESPONSE_STATUS, &[("code", code.as_str())]);

    response
}

/// Dispatches the path as received, then without its trailing slashes.
///
/// Captures always come from the untouched path, so `/check/<url>/` keeps
/// the slash that is part of the checked URL.
fn dispatch_path(routes: &RouteTable, path: &str) -> Result<Option<RouteMatch>, RoutingError> {
    if let Some(route_match) = routes.dispatch(path)? {
        return Ok(Some(route_match));
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == path {
        return Ok(None);
    }
    routes.dispatch(trimmed)
}

async fn run_controller(state: &AppState, route_match: &RouteMatch, uri: &Uri) -> Response {
    let result = match Controller::from_id(&route_match.controller_id) {
        Some(Controller::Health) => Ok(health_controller(state).await),
        Some(Controller::Reputation) => {
            reputation_controller(state, route_match, query_param(uri, "url")).await
        }
        Some(Controller::RouteInfo) => route_info_controller(state, route_match),
        None => Err(AppError::internal(
            "Route points at an unknown controller",
            json!({ "controller": route_match.controller_id }),
        )),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

/// Reads a query parameter without rejecting malformed query strings.
fn query_param(uri: &Uri, name: &str) -> Option<String> {
    url::form_urlencoded::parse(uri.query()?.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
