//! Metric names emitted by the service.

/// Resolution cache found a stored value.
pub const RESOLUTION_CACHE_HIT: &str = "resolution_cache_hit";
/// Resolution cache had to run the miss computation.
pub const RESOLUTION_CACHE_MISS: &str = "resolution_cache_miss";
/// Wall-clock duration of a miss computation, in milliseconds.
pub const RESOLUTION_CACHE_MISS_MS: &str = "resolution_cache_miss_ms";
/// A query was sent to Safe Browsing.
pub const SAFEBROWSING_QUERY: &str = "shorturl_blacklist_query_safebrowsing";
/// Duration of a Safe Browsing query, in milliseconds.
pub const SAFEBROWSING_QUERY_TIME: &str = "gsb_query_time";
/// Response status of every dispatched request, tagged with `code`.
pub const RESPONSE_STATUS: &str = "status";
