//! Application layer services.
//!
//! This layer combines the domain contracts with the infrastructure
//! collaborators and gives HTTP handlers a small API to call.
//!
//! # Available Services
//!
//! - [`services::resolution_cache::ResolutionCache`] - Cache-aside resolution of expensive lookups
//! - [`services::reputation_lookup::ReputationLookup`] - Safe Browsing query as a miss computation
//! - [`services::reputation_service::ReputationService`] - Normalize, resolve and report a URL's verdict

pub mod services;
