//! HTTP server initialization and runtime setup.
//!
//! Loads the route table, picks a backing store, wires the reputation client
//! and serves the front controller until shutdown.

use crate::api::handlers::ensure_known_controllers;
use crate::config::Config;
use crate::infrastructure::cache::{CacheStore, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::metrics::{MetricsRecorderSink, MetricsSink};
use crate::infrastructure::reputation::SafeBrowsingClient;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Route table (file or built-in) and its controller check
/// - Backing store (Redis, in-process or disabled)
/// - Safe Browsing client, when an API key is configured
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The route table cannot be loaded or names an unknown controller
/// - The Safe Browsing client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let routes = config.load_routes()?;
    ensure_known_controllers(&routes).context("Route table rejected")?;
    tracing::info!("Loaded {} routes", routes.len());

    let cache = build_cache(&config).await;
    let metrics: Arc<dyn MetricsSink> = Arc::new(MetricsRecorderSink::new());

    let mut state = AppState::new(routes, cache, metrics, config.failure_policy);

    if let Some(settings) = config.safe_browsing_settings() {
        let client =
            SafeBrowsingClient::new(settings).context("Failed to build Safe Browsing client")?;
        tracing::info!("Reputation checks enabled ({})", client.endpoint());
        state = state.with_reputation_provider(Arc::new(client));
    } else {
        tracing::warn!("Reputation checks disabled: SAFE_BROWSING_API_KEY not set");
    }

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Selects the backing store.
///
/// Redis when configured and reachable, otherwise the in-process store. An
/// unreachable Redis degrades to the in-process store rather than aborting
/// startup.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheStore> {
    if !config.cache_enabled {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    }

    let memory = || -> Arc<dyn CacheStore> {
        Arc::new(MemoryCache::new(
            config.cache_ttl_seconds,
            config.cache_max_entries,
        ))
    };

    match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process store.", e);
                memory()
            }
        },
        None => {
            tracing::info!("Cache enabled (in-process)");
            memory()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
