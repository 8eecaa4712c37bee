//! Pluggable computations run by the resolution cache on a miss.

use async_trait::async_trait;

/// Failure of a miss computation.
///
/// These errors are handed back to the caller unchanged and are never cached.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputationError {
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// "Given a key, produce a value", possibly slowly or unreliably.
///
/// Implementations hold no cache state. They are stateless or carry only
/// immutable construction parameters (for example the URL being checked), and
/// are responsible for bounding their own latency.
///
/// # Implementations
///
/// - [`crate::application::services::ReputationLookup`] - URL reputation query
#[async_trait]
pub trait MissComputation<T>: Send + Sync {
    /// Short label used to tag miss timings (e.g. `"safebrowsing"`).
    fn kind(&self) -> &str;

    /// Computes the value for `key`.
    ///
    /// # Errors
    ///
    /// Any [`ComputationError`]; the cache propagates it as-is.
    async fn run(&self, key: &str) -> Result<T, ComputationError>;
}
