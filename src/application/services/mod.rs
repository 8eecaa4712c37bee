//! Application services.

pub mod reputation_lookup;
pub mod reputation_service;
pub mod resolution_cache;

pub use reputation_lookup::ReputationLookup;
pub use reputation_service::{ReputationCheck, ReputationService};
pub use resolution_cache::ResolutionCache;
