//! Regex route table and request dispatcher.
//!
//! Routes are tried in declared order and the first pattern that matches a
//! prefix of the path wins. Specificity plays no part: with
//! `[("/foo/", "A"), ("/foo/bar", "B")]` the path `/foo/bar` goes to `A`.
//!
//! The table is built once at startup and never mutated, so it can be shared
//! across requests behind an `Arc` without locking.

use crate::domain::entities::{Route, RouteDefinition, RouteMatch};

/// Errors raised while building or querying a route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("No request path was provided")]
    MissingPath,

    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid route table: {0}")]
    InvalidTable(String),
}

/// Controllers served when no route file is configured.
const BUILTIN_ROUTES: &[(&str, &str)] = &[
    ("/health$", "health"),
    ("/check/(.+)", "reputation"),
    ("/check$", "reputation"),
    ("/_route(/.*)?$", "route_info"),
];

/// Ordered, read-only list of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Builds a table from already compiled routes, keeping their order.
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Compiles a table from configured definitions.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn from_definitions(definitions: &[RouteDefinition]) -> Result<Self, RoutingError> {
        let routes = definitions
            .iter()
            .map(|d| Route::new(&d.pattern, d.controller.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(routes))
    }

    /// Parses a JSON array of `{"pattern": ..., "controller": ...}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidTable`] if the document is not a list of
    /// route definitions, or [`RoutingError::InvalidPattern`] if a pattern
    /// does not compile.
    pub fn from_json(raw: &str) -> Result<Self, RoutingError> {
        let definitions: Vec<RouteDefinition> =
            serde_json::from_str(raw).map_err(|e| RoutingError::InvalidTable(e.to_string()))?;

        Self::from_definitions(&definitions)
    }

    /// The default table shipped with the service.
    pub fn builtin_definitions() -> Vec<RouteDefinition> {
        BUILTIN_ROUTES
            .iter()
            .map(|(pattern, controller)| RouteDefinition::new(*pattern, *controller))
            .collect()
    }

    /// Compiles the default table.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidPattern`] if a built-in pattern does not
    /// compile.
    pub fn builtin() -> Result<Self, RoutingError> {
        Self::from_definitions(&Self::builtin_definitions())
    }

    /// Resolves `path` to the first matching route.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RouteMatch))` for the first route whose pattern matches a
    ///   prefix of `path`
    /// - `Ok(None)` if no route matches
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::MissingPath`] if `path` is empty.
    pub fn dispatch(&self, path: &str) -> Result<Option<RouteMatch>, RoutingError> {
        if path.is_empty() {
            return Err(RoutingError::MissingPath);
        }

        for route in &self.routes {
            if let Some(caps) = route.pattern.captures(path) {
                let captures = caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();

                return Ok(Some(RouteMatch {
                    controller_id: route.controller_id.clone(),
                    captures,
                }));
            }
        }

        Ok(None)
    }

    /// Iterates over the routes in precedence order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
