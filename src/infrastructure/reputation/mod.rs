//! Upstream URL reputation services.

mod safe_browsing;

pub use safe_browsing::{
    DEFAULT_ENDPOINT, ReputationClientError, SafeBrowsingClient, SafeBrowsingSettings,
};
