//! URL reputation checks for controllers.

use std::sync::Arc;

use crate::application::services::{ReputationLookup, ResolutionCache};
use crate::domain::computation::ComputationError;
use crate::domain::entities::ReputationVerdict;
use crate::domain::reputation::ReputationProvider;
use crate::infrastructure::metrics::MetricsSink;
use crate::utils::url_normalizer::normalize_url;

/// Result of a reputation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationCheck {
    /// The normalized URL used as the cache key.
    pub url: String,
    pub verdict: ReputationVerdict,
}

/// Checks URLs against the reputation provider through the resolution cache.
///
/// The service only reports what it learned. Whether an inconclusive check
/// lets a URL through is up to the calling controller.
pub struct ReputationService {
    cache: Arc<ResolutionCache<ReputationVerdict>>,
    provider: Arc<dyn ReputationProvider>,
    metrics: Arc<dyn MetricsSink>,
}

impl ReputationService {
    pub fn new(
        cache: Arc<ResolutionCache<ReputationVerdict>>,
        provider: Arc<dyn ReputationProvider>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            cache,
            provider,
            metrics,
        }
    }

    /// Normalizes `raw_url` and resolves its verdict.
    ///
    /// The normalized URL is both the cache key and the URL sent upstream.
    ///
    /// # Errors
    ///
    /// - [`ComputationError::InvalidInput`] if the URL cannot be normalized
    /// - [`ComputationError::UpstreamUnavailable`] if the lookup failed
    pub async fn check(&self, raw_url: &str) -> Result<ReputationCheck, ComputationError> {
        let url =
            normalize_url(raw_url).map_err(|e| ComputationError::InvalidInput(e.to_string()))?;

        let lookup =
            ReputationLookup::new(url.clone(), self.provider.clone(), self.metrics.clone());
        let verdict = self.cache.resolve(&url, &lookup).await?;

        Ok(ReputationCheck { url, verdict })
    }
}
