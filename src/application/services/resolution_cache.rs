//! Cache-aside resolution of expensive lookups.
//!
//! [`ResolutionCache`] returns a stored value when there is one and otherwise
//! runs the caller-supplied [`MissComputation`], storing the result only if
//! the computation succeeded.
//!
//! # Metrics
//!
//! - Hit: one `resolution_cache_hit` counter, no timing
//! - Miss: one `resolution_cache_miss` counter and one `resolution_cache_miss_ms`
//!   timing sample tagged with the computation kind, whether the computation
//!   succeeded or not
//!
//! # Concurrency
//!
//! There is no single-flight coalescing: concurrent misses on the same key each
//! run the computation, and the last successful write wins. This costs
//! duplicate upstream queries under bursts for a fresh key, and keeps the cache
//! free of locks and waiters.

use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::domain::computation::{ComputationError, MissComputation};
use crate::domain::entities::CacheEntry;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::metrics::MetricsSink;
use crate::infrastructure::metrics::names::{
    RESOLUTION_CACHE_HIT, RESOLUTION_CACHE_MISS, RESOLUTION_CACHE_MISS_MS,
};

/// Generic cache-aside cache for values of type `T`.
///
/// Keys are scoped by `namespace` inside the backing store, so several caches
/// for different value types can share one store.
///
/// Backing store failures never fail a resolve: a failed or undecodable read
/// counts as a miss and a failed write is logged.
pub struct ResolutionCache<T> {
    namespace: String,
    store: Arc<dyn CacheStore>,
    metrics: Arc<dyn MetricsSink>,
    ttl_seconds: Option<u64>,
    _value: PhantomData<fn() -> T>,
}

impl<T> ResolutionCache<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a cache that stores entries with the store's default TTL.
    pub fn new(
        namespace: impl Into<String>,
        store: Arc<dyn CacheStore>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            store,
            metrics,
            ttl_seconds: None,
            _value: PhantomData,
        }
    }

    /// Overrides the TTL passed to the store on every write.
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the computation's [`ComputationError`] unchanged. Nothing is
    /// stored in that case, so the next call runs the computation again.
    pub async fn resolve<C>(&self, key: &str, computation: &C) -> Result<T, ComputationError>
    where
        C: MissComputation<T> + ?Sized,
    {
        let storage_key = self.storage_key(key);
        let tags = [
            ("cache", self.namespace.as_str()),
            ("computation", computation.kind()),
        ];

        if let Some(value) = self.load(&storage_key).await {
            debug!("Resolution HIT: {}", storage_key);
            self.metrics.increment_counter(RESOLUTION_CACHE_HIT, &tags);
            return Ok(value);
        }

        debug!("Resolution MISS: {}", storage_key);
        self.metrics.increment_counter(RESOLUTION_CACHE_MISS, &tags);

        let started = Instant::now();
        let outcome = computation.run(key).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics
            .record_timing(RESOLUTION_CACHE_MISS_MS, elapsed_ms, &tags);

        let value = outcome?;
        self.save(&storage_key, key, &value).await;
        Ok(value)
    }

    /// Reads the cached value for `key` without computing or emitting metrics.
    pub async fn peek(&self, key: &str) -> Option<T> {
        self.load(&self.storage_key(key)).await
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    async fn load(&self, storage_key: &str) -> Option<T> {
        let raw = match self.store.get(storage_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Cache read failed for {}: {}", storage_key, e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => Some(entry.value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", storage_key, e);
                None
            }
        }
    }

    async fn save(&self, storage_key: &str, key: &str, value: &T) {
        let entry = CacheEntry::new(key, value);

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", storage_key, e);
                return;
            }
        };

        if let Err(e) = self.store.put(storage_key, &raw, self.ttl_seconds).await {
            warn!("Cache write failed for {}: {}", storage_key, e);
        }
    }
}
