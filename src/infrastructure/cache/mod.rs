//! Backing stores for the resolution cache.
//!
//! Provides a [`CacheStore`] trait with three implementations:
//! - [`RedisCache`] - Shared Redis-backed store
//! - [`MemoryCache`] - In-process store (default when Redis is not configured)
//! - [`NullCache`] - No-op store for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheStore};
