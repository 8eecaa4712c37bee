//! CLI administration tool for url-guard.
//!
//! Inspects the route table, runs one-off reputation checks and prints the
//! effective configuration without starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Show the route table in dispatch order
//! cargo run --bin url-guard-admin -- routes list
//!
//! # Show which controller a path dispatches to
//! cargo run --bin url-guard-admin -- routes match /check/http://example.com/
//!
//! # Check a URL against Safe Browsing
//! cargo run --bin url-guard-admin -- check http://example.com/
//!
//! # Print the effective configuration
//! cargo run --bin url-guard-admin -- config
//! ```
//!
//! # Environment Variables
//!
//! Same as the server. `check` requires `SAFE_BROWSING_API_KEY`.

use url_guard::api::handlers::{Controller, ensure_known_controllers};
use url_guard::application::services::{ReputationService, ResolutionCache};
use url_guard::config::{Config, load_from_env, mask_connection_string};
use url_guard::domain::entities::ReputationVerdict;
use url_guard::domain::reputation::ReputationProvider;
use url_guard::domain::routing::RouteTable;
use url_guard::infrastructure::cache::MemoryCache;
use url_guard::infrastructure::metrics::{CapturingSink, MetricEvent, MetricsSink};
use url_guard::infrastructure::reputation::SafeBrowsingClient;
use url_guard::state::REPUTATION_NAMESPACE;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for inspecting url-guard.
#[derive(Parser)]
#[command(name = "url-guard-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect the route table
    Routes {
        #[command(subcommand)]
        action: RoutesAction,
    },

    /// Check a URL against the reputation service
    Check {
        /// URL to check
        url: String,
    },

    /// Print the effective configuration
    Config,
}

/// Route table subcommands.
#[derive(Subcommand)]
enum RoutesAction {
    /// List routes in dispatch order
    List,

    /// Show which route a path dispatches to
    Match {
        /// Request path, e.g. `/check/http://example.com/`
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Routes { action } => handle_routes_action(action, &config)?,
        Commands::Check { url } => handle_check(&url, &config).await?,
        Commands::Config => handle_config(&config),
    }

    Ok(())
}

fn load_table(config: &Config) -> Result<RouteTable> {
    let table = config.load_routes()?;
    ensure_known_controllers(&table)?;
    Ok(table)
}

/// Dispatches route table commands.
fn handle_routes_action(action: RoutesAction, config: &Config) -> Result<()> {
    let table = load_table(config)?;

    match action {
        RoutesAction::List => list_routes(&table, config),
        RoutesAction::Match { path } => match_route(&table, &path)?,
    }

    Ok(())
}

fn list_routes(table: &RouteTable, config: &Config) {
    println!("{}", "Route table".bright_blue().bold());
    println!(
        "  Source: {}",
        config
            .routes_file
            .as_deref()
            .unwrap_or("built-in")
            .bright_white()
    );
    println!();

    if table.is_empty() {
        println!("{}", "  No routes defined".yellow());
        println!();
        return;
    }

    println!(
        "  {:<4} {:<40} {}",
        "#".bright_white().bold(),
        "Pattern".bright_white().bold(),
        "Controller".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for (i, route) in table.routes().enumerate() {
        println!(
            "  {:<4} {:<40} {}",
            (i + 1).to_string().bright_black(),
            route.pattern.as_str(),
            route.controller_id.cyan()
        );
    }

    println!();
    println!(
        "  Controllers: {}",
        Controller::ALL
            .iter()
            .map(|c| c.id())
            .collect::<Vec<_>>()
            .join(", ")
            .bright_black()
    );
    println!();
}

fn match_route(table: &RouteTable, path: &str) -> Result<()> {
    match table.dispatch(path)? {
        Some(route_match) => {
            println!("{}", "Matched".green().bold());
            println!("  Path:       {}", path.bright_white());
            println!("  Controller: {}", route_match.controller_id.cyan());
            for (i, capture) in route_match.captures.iter().enumerate() {
                println!("  Capture {}:  {}", i, capture.bright_yellow());
            }
        }
        None => {
            println!("{}", "No route matches (404)".yellow().bold());
            println!("  Path: {}", path.bright_white());
        }
    }
    println!();

    Ok(())
}

/// Runs a single reputation check against Safe Browsing.
async fn handle_check(url: &str, config: &Config) -> Result<()> {
    let Some(settings) = config.safe_browsing_settings() else {
        bail!("SAFE_BROWSING_API_KEY must be set");
    };

    println!("{}", "Reputation check".bright_blue().bold());
    println!("  Endpoint: {}", settings.endpoint.bright_black());
    println!();

    let client =
        SafeBrowsingClient::new(settings).context("Failed to build Safe Browsing client")?;
    run_check(url, Arc::new(client), config.cache_ttl_seconds).await?;

    Ok(())
}

/// Checks `url` once and shows the verdict and the metrics it emitted.
///
/// A failed check is reported as an error after the metrics are printed, so
/// the process exits non-zero.
async fn run_check(
    url: &str,
    provider: Arc<dyn ReputationProvider>,
    ttl_seconds: u64,
) -> Result<ReputationVerdict> {
    let sink = Arc::new(CapturingSink::new());
    let metrics: Arc<dyn MetricsSink> = sink.clone();
    let cache = ResolutionCache::new(
        REPUTATION_NAMESPACE,
        Arc::new(MemoryCache::new(ttl_seconds, 1)),
        metrics.clone(),
    );
    let service = ReputationService::new(Arc::new(cache), provider, metrics);

    let result = service.check(url).await;
    match &result {
        Ok(check) => {
            println!("  URL:     {}", check.url.bright_white());
            match &check.verdict {
                ReputationVerdict::Safe => println!("  Verdict: {}", "safe".green().bold()),
                ReputationVerdict::Flagged { threats } => {
                    println!("  Verdict: {}", "flagged".red().bold());
                    println!("  Threats: {}", threats.join(", ").red());
                }
            }
        }
        Err(e) => println!("  {}", e.to_string().red().bold()),
    }

    println!();
    println!("{}", "Metrics emitted:".bright_white().bold());
    for event in sink.events() {
        match event {
            MetricEvent::Counter { name, .. } => println!("  counter {}", name.cyan()),
            MetricEvent::Timing { name, millis, .. } => {
                println!("  timing  {} {:.1}ms", name.cyan(), millis)
            }
        }
    }
    println!();

    let check = result.with_context(|| format!("Reputation check failed for {}", url))?;
    Ok(check.verdict)
}

/// Prints the effective configuration with credentials masked.
fn handle_config(config: &Config) {
    println!("{}", "Configuration".bright_blue().bold());
    println!();
    println!("  Listen:        {}", config.listen_addr.bright_white());
    println!(
        "  Cache:         {}",
        match (&config.redis_url, config.cache_enabled) {
            (_, false) => "disabled".to_string(),
            (Some(url), true) => format!("redis ({})", mask_connection_string(url)),
            (None, true) => format!("in-process ({} entries)", config.cache_max_entries),
        }
        .bright_white()
    );
    println!("  Cache TTL:     {}s", config.cache_ttl_seconds);
    println!(
        "  Routes:        {}",
        config.routes_file.as_deref().unwrap_or("built-in")
    );
    println!(
        "  Reputation:    {}",
        if config.safe_browsing_api_key.is_some() {
            config.safe_browsing_endpoint.green()
        } else {
            "disabled".yellow()
        }
    );
    println!(
        "  Upstream:      timeout {}ms, {} retries, {:?}",
        config.reputation_timeout_ms, config.reputation_retries, config.failure_policy
    );
    println!(
        "  Metrics:       {}",
        config.metrics_listen.as_deref().unwrap_or("disabled")
    );
    println!(
        "  Logging:       {} ({})",
        config.log_level, config.log_format
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use url_guard::domain::computation::ComputationError;

    struct FixedProvider(Result<ReputationVerdict, ComputationError>);

    #[async_trait]
    impl ReputationProvider for FixedProvider {
        async fn lookup(&self, _url: &str) -> Result<ReputationVerdict, ComputationError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_run_check_returns_verdict() {
        let provider = Arc::new(FixedProvider(Ok(ReputationVerdict::from_threats([
            "MALWARE",
        ]))));

        let verdict = run_check("http://evil.example/", provider, 60).await.unwrap();

        assert!(matches!(verdict, ReputationVerdict::Flagged { .. }));
    }

    #[tokio::test]
    async fn test_run_check_fails_when_upstream_fails() {
        let provider = Arc::new(FixedProvider(Err(ComputationError::UpstreamUnavailable(
            "timed out".to_string(),
        ))));

        let err = run_check("http://evil.example/", provider, 60)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("http://evil.example/"));
    }

    #[tokio::test]
    async fn test_run_check_fails_on_invalid_url() {
        let provider = Arc::new(FixedProvider(Ok(ReputationVerdict::Safe)));

        assert!(run_check("not a url", provider, 60).await.is_err());
    }
}
