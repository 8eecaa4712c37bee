#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url_guard::config::FailurePolicy;
use url_guard::domain::computation::{ComputationError, MissComputation};
use url_guard::domain::entities::ReputationVerdict;
use url_guard::domain::reputation::ReputationProvider;
use url_guard::domain::routing::RouteTable;
use url_guard::infrastructure::cache::{CacheError, CacheResult, CacheStore, MemoryCache};
use url_guard::infrastructure::metrics::CapturingSink;
use url_guard::state::AppState;

/// Reputation provider returning a preset outcome and counting lookups.
pub struct StubProvider {
    outcome: Mutex<Result<ReputationVerdict, ComputationError>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(outcome: Result<ReputationVerdict, ComputationError>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn safe() -> Arc<Self> {
        Self::new(Ok(ReputationVerdict::Safe))
    }

    pub fn flagged(threat: &str) -> Arc<Self> {
        Self::new(Ok(ReputationVerdict::from_threats([threat])))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Err(ComputationError::UpstreamUnavailable(
            "connection refused".to_string(),
        )))
    }

    pub fn set_outcome(&self, outcome: Result<ReputationVerdict, ComputationError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReputationProvider for StubProvider {
    async fn lookup(&self, url: &str) -> Result<ReputationVerdict, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.outcome.lock().unwrap().clone()
    }
}

/// Computation returning a fixed value after an optional delay.
pub struct CountingComputation<T> {
    kind: &'static str,
    outcome: Result<T, ComputationError>,
    delay_ms: u64,
    calls: AtomicUsize,
}

impl<T: Clone + Send + Sync> CountingComputation<T> {
    pub fn ok(value: T) -> Self {
        Self::new(Ok(value))
    }

    pub fn err(error: ComputationError) -> Self {
        Self::new(Err(error))
    }

    fn new(outcome: Result<T, ComputationError>) -> Self {
        Self {
            kind: "counting",
            outcome,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> MissComputation<T> for CountingComputation<T> {
    fn kind(&self) -> &str {
        self.kind
    }

    async fn run(&self, _key: &str) -> Result<T, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.outcome.clone()
    }
}

/// Store that is unreachable.
pub struct DownStore;

#[async_trait]
impl CacheStore for DownStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("down".to_string()))
    }

    async fn put(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> CacheResult<()> {
        Err(CacheError::ConnectionError("down".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

pub fn memory_store() -> Arc<dyn CacheStore> {
    Arc::new(MemoryCache::new(60, 100))
}

/// State over the built-in routes and an in-process store.
pub fn create_test_state(
    provider: Option<Arc<StubProvider>>,
    policy: FailurePolicy,
) -> (AppState, Arc<CapturingSink>) {
    let routes = RouteTable::builtin().unwrap();
    create_state_with(routes, memory_store(), provider, policy)
}

pub fn create_state_with(
    routes: RouteTable,
    cache: Arc<dyn CacheStore>,
    provider: Option<Arc<StubProvider>>,
    policy: FailurePolicy,
) -> (AppState, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::new());
    let state = AppState::new(routes, cache, sink.clone(), policy);

    let state = match provider {
        Some(provider) => state.with_reputation_provider(provider),
        None => state,
    };

    (state, sink)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
