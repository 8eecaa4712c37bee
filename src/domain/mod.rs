//! Domain layer containing the dispatcher and the resolution contracts.
//!
//! Nothing here depends on HTTP, the cache backends or the metrics backend.
//!
//! # Architecture
//!
//! - [`entities`] - Routes, cache entries and reputation verdicts
//! - [`routing`] - Ordered regex route table ([`routing::RouteTable`])
//! - [`computation`] - The [`computation::MissComputation`] capability
//! - [`reputation`] - The [`reputation::ReputationProvider`] upstream contract
//!
//! # Request Flow
//!
//! 1. The front controller hands the request path to [`routing::RouteTable::dispatch`]
//! 2. The selected controller builds a [`computation::MissComputation`]
//! 3. [`crate::application::services::ResolutionCache`] returns a cached value
//!    or runs the computation

pub mod computation;
pub mod entities;
pub mod reputation;
pub mod routing;
