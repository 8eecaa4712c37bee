//! Top-level router.
//!
//! The router has no path routes of its own: every request falls through to
//! the front controller, which consults the configured route table.
//!
//! # Middleware
//!
//! - **Tracing** - Request span and response log at `INFO`, latency in ms
//!
//! Paths reach the front controller untouched: a trailing slash may belong to
//! a URL captured from the path.

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::api::handlers::front_controller;
use crate::state::AppState;

/// Constructs the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .fallback(front_controller)
        .with_state(state)
        .layer(trace_layer())
}

/// Logs a span per request and the response status with its latency.
///
/// ```text
/// INFO request{method=GET uri=/check/http://a.example version=HTTP/1.1}: finished processing request latency=12 ms status=200
/// ```
fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
