//! Shared application state injected into every controller.

use std::sync::Arc;

use crate::application::services::{ReputationService, ResolutionCache};
use crate::config::FailurePolicy;
use crate::domain::reputation::ReputationProvider;
use crate::domain::routing::RouteTable;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::metrics::MetricsSink;

/// Namespace of reputation verdicts inside the backing store.
pub const REPUTATION_NAMESPACE: &str = "reputation";

#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub cache: Arc<dyn CacheStore>,
    pub metrics: Arc<dyn MetricsSink>,
    /// `None` when no reputation provider is configured.
    pub reputation_service: Option<Arc<ReputationService>>,
    pub failure_policy: FailurePolicy,
}

impl AppState {
    /// Creates state without a reputation provider.
    pub fn new(
        routes: RouteTable,
        cache: Arc<dyn CacheStore>,
        metrics: Arc<dyn MetricsSink>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            cache,
            metrics,
            reputation_service: None,
            failure_policy,
        }
    }

    /// Enables reputation checks, caching verdicts in the shared store.
    pub fn with_reputation_provider(mut self, provider: Arc<dyn ReputationProvider>) -> Self {
        let resolution = ResolutionCache::new(
            REPUTATION_NAMESPACE,
            self.cache.clone(),
            self.metrics.clone(),
        );

        self.reputation_service = Some(Arc::new(ReputationService::new(
            Arc::new(resolution),
            provider,
            self.metrics.clone(),
        )));
        self
    }
}
