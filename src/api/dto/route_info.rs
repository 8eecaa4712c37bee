//! DTOs for the route inspection controller.

use serde::Serialize;

use crate::domain::entities::RouteMatch;

/// Which controller a path dispatches to.
#[derive(Debug, Serialize)]
pub struct RouteInfoResponse {
    pub path: String,
    pub matched: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    pub captures: Vec<String>,
}

impl RouteInfoResponse {
    pub fn new(path: impl Into<String>, route_match: Option<RouteMatch>) -> Self {
        let path = path.into();
        match route_match {
            Some(m) => Self {
                path,
                matched: true,
                controller: Some(m.controller_id),
                captures: m.captures,
            },
            None => Self {
                path,
                matched: false,
                controller: None,
                captures: Vec::new(),
            },
        }
    }
}
