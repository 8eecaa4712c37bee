//! Route entities used by the request dispatcher.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::routing::RoutingError;

/// A compiled pattern-to-controller mapping.
///
/// The pattern is anchored at the start of the path but is not required to
/// consume the whole path: `/foo/` matches `/foo/bar`. Add a trailing `$` to a
/// pattern when an exact match is wanted.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: Regex,
    pub controller_id: String,
}

impl Route {
    /// Compiles a route from its raw pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidPattern`] if the pattern is not a valid regex.
    pub fn new(pattern: &str, controller_id: impl Into<String>) -> Result<Self, RoutingError> {
        let anchored = format!("^(?:{})", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: compiled,
            controller_id: controller_id.into(),
        })
    }
}

/// Raw route as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub pattern: String,
    pub controller: String,
}

impl RouteDefinition {
    pub fn new(pattern: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            controller: controller.into(),
        }
    }
}

/// The result of a successful dispatch.
///
/// `captures` holds the pattern's capture groups in the order they appear in
/// the pattern. A group that did not take part in the match is an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub controller_id: String,
    pub captures: Vec<String>,
}

impl RouteMatch {
    /// Returns the capture at `index`, treating empty captures as absent.
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures
            .get(index)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}
