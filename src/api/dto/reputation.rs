//! DTOs for the reputation controller.

use serde::Serialize;

use crate::application::services::ReputationCheck;
use crate::domain::entities::ReputationVerdict;

/// Outcome of a reputation check.
///
/// # Example
///
/// ```json
/// {
///   "url": "http://evil.example/",
///   "status": "flagged",
///   "allowed": false,
///   "threats": ["MALWARE"]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ReputationResponse {
    pub url: String,
    /// `safe`, `flagged` or `unknown`
    pub status: &'static str,
    pub allowed: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<String>,
}

impl ReputationResponse {
    /// Answer for a check that could not reach the upstream service and was
    /// let through.
    pub fn unknown(url: String) -> Self {
        Self {
            url,
            status: "unknown",
            allowed: true,
            threats: Vec::new(),
        }
    }
}

impl From<ReputationCheck> for ReputationResponse {
    fn from(check: ReputationCheck) -> Self {
        match check.verdict {
            ReputationVerdict::Safe => Self {
                url: check.url,
                status: "safe",
                allowed: true,
                threats: Vec::new(),
            },
            ReputationVerdict::Flagged { threats } => Self {
                url: check.url,
                status: "flagged",
                allowed: false,
                threats,
            },
        }
    }
}
