//! # URL Guard
//!
//! Front-end core of a URL shortening service: a regex route dispatcher and a
//! cache-aside resolution layer guarding URL reputation checks.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Routes, verdicts, the dispatcher and the
//!   miss computation capability
//! - **Application Layer** ([`application`]) - [`ResolutionCache`] and the
//!   reputation check built on it
//! - **Infrastructure Layer** ([`infrastructure`]) - Backing stores, metrics
//!   sinks and the Safe Browsing client
//! - **API Layer** ([`api`]) - Front controller, controllers and DTOs
//!
//! ## Request Flow
//!
//! 1. The front controller dispatches the path through the [`RouteTable`]
//! 2. The first route whose pattern matches a prefix of the path picks the
//!    controller
//! 3. The reputation controller resolves the URL verdict through the
//!    [`ResolutionCache`], which only calls Safe Browsing on a miss
//!
//! ## Quick Start
//!
//! ```bash
//! export SAFE_BROWSING_API_KEY="..."
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! curl http://localhost:3000/check/http://example.com/
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.
//!
//! [`ResolutionCache`]: application::services::ResolutionCache
//! [`RouteTable`]: domain::routing::RouteTable

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;
pub mod telemetry;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ReputationService, ResolutionCache};
    pub use crate::domain::computation::{ComputationError, MissComputation};
    pub use crate::domain::entities::{ReputationVerdict, RouteMatch};
    pub use crate::domain::reputation::ReputationProvider;
    pub use crate::domain::routing::{RouteTable, RoutingError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::CacheStore;
    pub use crate::infrastructure::metrics::MetricsSink;
    pub use crate::state::AppState;
}
