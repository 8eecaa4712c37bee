//! Reputation lookup as a resolution-cache miss computation.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::computation::{ComputationError, MissComputation};
use crate::domain::entities::ReputationVerdict;
use crate::domain::reputation::ReputationProvider;
use crate::infrastructure::metrics::MetricsSink;
use crate::infrastructure::metrics::names::{SAFEBROWSING_QUERY, SAFEBROWSING_QUERY_TIME};

/// Queries the reputation provider for one URL.
///
/// Constructed per check with the URL to send upstream. The cache key passed to
/// [`MissComputation::run`] is usually the normalized form of the same URL and
/// is not sent anywhere.
///
/// Every run emits a query counter and a query-duration sample around the
/// upstream call, whether it succeeds or not, so upstream latency and error
/// rates stay visible independently of cache behavior.
pub struct ReputationLookup {
    url: String,
    provider: Arc<dyn ReputationProvider>,
    metrics: Arc<dyn MetricsSink>,
}

impl ReputationLookup {
    pub fn new(
        url: impl Into<String>,
        provider: Arc<dyn ReputationProvider>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            url: url.into(),
            provider,
            metrics,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MissComputation<ReputationVerdict> for ReputationLookup {
    fn kind(&self) -> &str {
        "safebrowsing"
    }

    async fn run(&self, _key: &str) -> Result<ReputationVerdict, ComputationError> {
        self.metrics.increment_counter(SAFEBROWSING_QUERY, &[]);

        let started = Instant::now();
        let verdict = self.provider.lookup(&self.url).await;
        self.metrics.record_timing(
            SAFEBROWSING_QUERY_TIME,
            started.elapsed().as_secs_f64() * 1000.0,
            &[],
        );

        verdict
    }
}
