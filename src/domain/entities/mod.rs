//! Core domain entities.
//!
//! Entities are plain data structures shared by the dispatcher, the resolution
//! cache and the reputation check.
//!
//! # Entity Types
//!
//! - [`Route`] / [`RouteDefinition`] - Compiled and configured route table rows
//! - [`RouteMatch`] - The controller selected for a request path
//! - [`CacheEntry`] - A value stored by the resolution cache
//! - [`ReputationVerdict`] - The outcome of a URL reputation lookup

pub mod cache_entry;
pub mod route;
pub mod verdict;

pub use cache_entry::CacheEntry;
pub use route::{Route, RouteDefinition, RouteMatch};
pub use verdict::ReputationVerdict;
