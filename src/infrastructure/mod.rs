//! Infrastructure layer for external integrations.
//!
//! This layer provides concrete implementations of the collaborators the
//! domain and application layers depend on.
//!
//! # Modules
//!
//! - [`cache`] - Backing stores for the resolution cache (Redis, memory, no-op)
//! - [`metrics`] - Metrics sink over the `metrics` facade
//! - [`reputation`] - Google Safe Browsing client

pub mod cache;
pub mod metrics;
pub mod reputation;
