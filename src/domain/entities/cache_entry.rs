//! Cache entry stored by the resolution cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A computed value together with the key it was computed for.
///
/// Entries are serialized to JSON before they reach the backing store, so any
/// store that can hold a string can hold any entry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stamped with the current time.
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at: Utc::now(),
        }
    }
}
