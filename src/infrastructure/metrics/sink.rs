//! Metrics sink trait and implementations.

use metrics::Label;
use std::sync::Mutex;

/// Narrow emit interface for counters and timing samples.
///
/// Implementations must be thread-safe; they are shared by every request.
///
/// # Implementations
///
/// - [`MetricsRecorderSink`] - Forwards to the global `metrics` recorder
/// - [`CapturingSink`] - Keeps events in memory for inspection
pub trait MetricsSink: Send + Sync {
    /// Increments the counter `name` by one.
    fn increment_counter(&self, name: &str, tags: &[(&str, &str)]);

    /// Records a timing sample in milliseconds.
    fn record_timing(&self, name: &str, millis: f64, tags: &[(&str, &str)]);
}

fn to_labels(tags: &[(&str, &str)]) -> Vec<Label> {
    tags.iter()
        .map(|(k, v)| Label::new(k.to_string(), v.to_string()))
        .collect()
}

/// Sink backed by the `metrics` facade.
///
/// Counters map to `metrics` counters and timings to histograms. Whatever
/// recorder is installed (Prometheus exporter, debugging recorder, none)
/// receives the samples.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorderSink;

impl MetricsRecorderSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for MetricsRecorderSink {
    fn increment_counter(&self, name: &str, tags: &[(&str, &str)]) {
        metrics::counter!(name.to_string(), to_labels(tags)).increment(1);
    }

    fn record_timing(&self, name: &str, millis: f64, tags: &[(&str, &str)]) {
        metrics::histogram!(name.to_string(), to_labels(tags)).record(millis);
    }
}

/// A single emitted metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    Counter {
        name: String,
        tags: Vec<(String, String)>,
    },
    Timing {
        name: String,
        millis: f64,
        tags: Vec<(String, String)>,
    },
}

impl MetricEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Counter { name, .. } | Self::Timing { name, .. } => name,
        }
    }

    /// Returns the value of tag `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        let tags = match self {
            Self::Counter { tags, .. } | Self::Timing { tags, .. } => tags,
        };
        tags.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sink that records every event in memory.
///
/// Used by the admin CLI to show what a one-off check emitted, and by tests.
#[derive(Debug, Default)]
pub struct CapturingSink {
    events: Mutex<Vec<MetricEvent>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events in emission order.
    pub fn events(&self) -> Vec<MetricEvent> {
        self.lock().clone()
    }

    /// Number of increments recorded for counter `name`.
    pub fn counter(&self, name: &str) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, MetricEvent::Counter { name: n, .. } if n == name))
            .count()
    }

    /// Timing samples recorded under `name`.
    pub fn timings(&self, name: &str) -> Vec<f64> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                MetricEvent::Timing { name: n, millis, .. } if n == name => Some(*millis),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MetricEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn owned_tags(tags: &[(&str, &str)]) -> Vec<(String, String)> {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl MetricsSink for CapturingSink {
    fn increment_counter(&self, name: &str, tags: &[(&str, &str)]) {
        self.lock().push(MetricEvent::Counter {
            name: name.to_string(),
            tags: owned_tags(tags),
        });
    }

    fn record_timing(&self, name: &str, millis: f64, tags: &[(&str, &str)]) {
        self.lock().push(MetricEvent::Timing {
            name: name.to_string(),
            millis,
            tags: owned_tags(tags),
        });
    }
}
