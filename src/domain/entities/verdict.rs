//! Reputation verdict for a checked URL.

use serde::{Deserialize, Serialize};

/// Outcome of a URL reputation lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ReputationVerdict {
    /// The upstream service has no record of the URL.
    Safe,
    /// The URL is listed; `threats` holds the upstream threat types.
    Flagged { threats: Vec<String> },
}

impl ReputationVerdict {
    /// Builds a verdict from the threat types reported upstream.
    ///
    /// Duplicates are removed and the list is sorted. An empty list is `Safe`.
    pub fn from_threats<I, S>(threats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut threats: Vec<String> = threats.into_iter().map(Into::into).collect();
        threats.sort();
        threats.dedup();

        if threats.is_empty() {
            Self::Safe
        } else {
            Self::Flagged { threats }
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}
