//! Cache store trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Backing store for the resolution cache.
///
/// Stores opaque string values under string keys. Expiry and eviction are
/// entirely the store's business; callers only get and put.
///
/// Implementations must be thread-safe, and operations on different keys must
/// not block each other.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed store with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process store with TTL and capacity
/// - [`crate::infrastructure::cache::NullCache`] - No-op store for disabled caching
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves a stored value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on hit
    /// - `Ok(None)` if the key is absent or expired
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend could not be queried. Callers
    /// treat that as a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with an optional TTL.
    ///
    /// # Arguments
    ///
    /// - `key` - The storage key
    /// - `value` - The serialized value
    /// - `ttl_seconds` - Optional TTL in seconds (implementation-specific default if None)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the write failed.
    async fn put(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health controller to report cache status.
    async fn health_check(&self) -> bool;

    /// Backend name reported by health checks.
    fn backend(&self) -> &'static str;
}
