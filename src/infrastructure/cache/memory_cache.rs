//! In-process cache implementation.

use super::service::{CacheResult, CacheStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

struct StoredValue {
    value: String,
    /// Write sequence number, matched against the insertion queue.
    seq: u64,
    expires_at: Instant,
}

/// A sharded in-memory store with TTL expiry and a capacity bound.
///
/// Used when Redis is not configured or unreachable. Entries are private to
/// the process. Writes are recorded in an insertion queue; when the store is
/// full, the oldest write is evicted without scanning the map.
pub struct MemoryCache {
    entries: DashMap<String, StoredValue>,
    /// `(key, seq)` per write, oldest first. Records whose `seq` no longer
    /// matches the stored entry are stale and skipped.
    order: Mutex<VecDeque<(String, u64)>>,
    next_seq: AtomicU64,
    default_ttl: Duration,
    max_entries: usize,
}

impl MemoryCache {
    /// Creates an empty store.
    ///
    /// `max_entries` is clamped to at least 1.
    pub fn new(default_ttl_seconds: u64, max_entries: usize) -> Self {
        debug!(
            "Using MemoryCache (ttl: {}s, capacity: {})",
            default_ttl_seconds, max_entries
        );
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            next_seq: AtomicU64::new(0),
            default_ttl: Duration::from_secs(default_ttl_seconds),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn order(&self) -> MutexGuard<'_, VecDeque<(String, u64)>> {
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a write and evicts the oldest entries while over capacity.
    ///
    /// Never holds a map shard lock while waiting for the queue.
    fn record_write(&self, key: &str, seq: u64) {
        let mut order = self.order();
        order.push_back((key.to_string(), seq));

        while self.entries.len() > self.max_entries {
            let Some((oldest, oldest_seq)) = order.pop_front() else {
                break;
            };
            if self
                .entries
                .remove_if(&oldest, |_, v| v.seq == oldest_seq)
                .is_some()
            {
                debug!("MemoryCache evict: {}", oldest);
            }
        }

        // Overwrites and expiries leave stale records behind.
        if order.len() > self.max_entries.saturating_mul(2) {
            order.retain(|(key, seq)| self.entries.get(key).is_some_and(|v| v.seq == *seq));
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        if self
            .entries
            .remove_if(key, |_, v| v.expires_at <= now)
            .is_some()
        {
            debug!("MemoryCache expired: {}", key);
            return Ok(None);
        }

        Ok(self.entries.get(key).map(|v| v.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let now = Instant::now();
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        self.entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                seq,
                expires_at: now + ttl,
            },
        );
        self.record_write(key, seq);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
