//! Reputation provider contract.

use async_trait::async_trait;

use crate::domain::computation::ComputationError;
use crate::domain::entities::ReputationVerdict;

/// Upstream service that knows whether a URL is malicious.
///
/// # Implementations
///
/// - [`crate::infrastructure::reputation::SafeBrowsingClient`] - Google Safe Browsing v4
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationProvider: Send + Sync {
    /// Looks up `url` upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::UpstreamUnavailable`] on transport or
    /// upstream failure, after whatever retries the provider applies.
    async fn lookup(&self, url: &str) -> Result<ReputationVerdict, ComputationError>;
}
