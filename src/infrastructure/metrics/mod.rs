//! Metrics emission.
//!
//! Code emits through the [`MetricsSink`] trait so that the resolution cache
//! and the reputation lookup never depend on a concrete metrics backend.

pub mod names;
mod sink;

pub use sink::{CapturingSink, MetricEvent, MetricsRecorderSink, MetricsSink};
