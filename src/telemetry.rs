//! Logging and metrics initialization.

use std::net::SocketAddr;
use std::sync::Once;

use anyhow::{Context, Result};
use metrics::{Unit, describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::Config;
use crate::infrastructure::metrics::names;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Installs the global tracing subscriber and, if configured, the Prometheus
/// exporter.
///
/// `RUST_LOG` directives win over the configured default level.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed, or if the metrics
/// exporter cannot bind its address.
pub fn init(config: &Config) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;

    let fmt_layer = match config.log_format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        _ => fmt::layer().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(addr) = &config.metrics_listen {
        install_exporter(addr)?;
    }

    describe_metrics();
    Ok(())
}

fn install_exporter(addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid METRICS_LISTEN address '{}'", addr))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    tracing::info!("Metrics exporter listening on http://{addr}/metrics");
    Ok(())
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            names::RESOLUTION_CACHE_HIT,
            Unit::Count,
            "Resolutions answered from the backing store."
        );
        describe_counter!(
            names::RESOLUTION_CACHE_MISS,
            Unit::Count,
            "Resolutions that ran their miss computation."
        );
        describe_histogram!(
            names::RESOLUTION_CACHE_MISS_MS,
            Unit::Milliseconds,
            "Miss computation latency in milliseconds."
        );
        describe_counter!(
            names::SAFEBROWSING_QUERY,
            Unit::Count,
            "Queries sent to Safe Browsing."
        );
        describe_histogram!(
            names::SAFEBROWSING_QUERY_TIME,
            Unit::Milliseconds,
            "Safe Browsing query latency in milliseconds."
        );
        describe_counter!(
            names::RESPONSE_STATUS,
            Unit::Count,
            "Responses by status code."
        );
    });
}
