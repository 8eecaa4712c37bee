mod common;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url_guard::domain::computation::ComputationError;
use url_guard::domain::entities::ReputationVerdict;
use url_guard::domain::reputation::ReputationProvider;
use url_guard::infrastructure::reputation::{SafeBrowsingClient, SafeBrowsingSettings};

/// One request as the mock upstream saw it.
#[derive(Clone)]
struct SeenRequest {
    query: HashMap<String, String>,
    api_key: Option<String>,
    body: Value,
}

/// What the mock upstream saw and how it should answer.
#[derive(Clone)]
struct Upstream {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
    /// Status codes answered for the first calls, 200 afterwards.
    failures: Arc<Vec<StatusCode>>,
    body: Value,
    delay: Duration,
}

impl Upstream {
    fn answering(body: Value) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Vec::new()),
            body,
            delay: Duration::ZERO,
        }
    }

    fn failing_with(mut self, failures: Vec<StatusCode>) -> Self {
        self.failures = Arc::new(failures);
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn find(
    State(upstream): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let call = upstream.calls.fetch_add(1, Ordering::SeqCst);
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    upstream.requests.lock().unwrap().push(SeenRequest {
        query,
        api_key,
        body,
    });

    if !upstream.delay.is_zero() {
        tokio::time::sleep(upstream.delay).await;
    }

    match upstream.failures.get(call) {
        Some(status) => (*status, "upstream error").into_response(),
        None => Json(upstream.body.clone()).into_response(),
    }
}

async fn client_for(upstream: &Upstream, retries: usize, timeout_ms: u64) -> SafeBrowsingClient {
    let app = Router::new()
        .route("/find", post(find))
        .with_state(upstream.clone());
    let base = common::spawn_upstream(app).await;

    SafeBrowsingClient::new(SafeBrowsingSettings {
        api_key: "test-key".to_string(),
        endpoint: format!("{}/find", base),
        client_id: "url-guard-tests".to_string(),
        timeout: Duration::from_millis(timeout_ms),
        retries,
    })
    .unwrap()
}

#[tokio::test]
async fn test_empty_response_is_safe() {
    let upstream = Upstream::answering(json!({}));
    let client = client_for(&upstream, 0, 1000).await;

    let verdict = client.lookup("http://example.com/").await;

    assert_eq!(verdict, Ok(ReputationVerdict::Safe));
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_request_carries_key_and_url() {
    let upstream = Upstream::answering(json!({}));
    let client = client_for(&upstream, 0, 1000).await;

    client.lookup("http://example.com/a").await.unwrap();

    let requests = upstream.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let seen = &requests[0];
    let body = &seen.body;
    assert_eq!(seen.api_key.as_deref(), Some("test-key"));
    assert!(seen.query.is_empty());
    assert_eq!(body["client"]["clientId"], "url-guard-tests");
    assert_eq!(
        body["threatInfo"]["threatEntries"][0]["url"],
        "http://example.com/a"
    );
    assert!(
        body["threatInfo"]["threatTypes"]
            .as_array()
            .unwrap()
            .contains(&json!("MALWARE"))
    );
}

#[tokio::test]
async fn test_matches_are_flagged() {
    let upstream = Upstream::answering(json!({
        "matches": [
            { "threatType": "SOCIAL_ENGINEERING", "platformType": "ANY_PLATFORM" },
            { "threatType": "MALWARE", "platformType": "ANY_PLATFORM" },
            { "threatType": "MALWARE", "platformType": "WINDOWS" }
        ]
    }));
    let client = client_for(&upstream, 0, 1000).await;

    let verdict = client.lookup("http://evil.example/").await.unwrap();

    assert_eq!(
        verdict,
        ReputationVerdict::Flagged {
            threats: vec!["MALWARE".to_string(), "SOCIAL_ENGINEERING".to_string()]
        }
    );
}

#[tokio::test]
async fn test_server_errors_are_retried_then_fail() {
    let upstream = Upstream::answering(json!({})).failing_with(vec![
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::INTERNAL_SERVER_ERROR,
    ]);
    let client = client_for(&upstream, 2, 1000).await;

    let result = client.lookup("http://evil.example").await;

    assert!(matches!(result, Err(ComputationError::UpstreamUnavailable(_))));
    assert_eq!(upstream.calls(), 3);
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let upstream = Upstream::answering(json!({}))
        .failing_with(vec![StatusCode::SERVICE_UNAVAILABLE]);
    let client = client_for(&upstream, 2, 1000).await;

    let verdict = client.lookup("http://example.com/").await;

    assert_eq!(verdict, Ok(ReputationVerdict::Safe));
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let upstream = Upstream::answering(json!({})).failing_with(vec![StatusCode::BAD_REQUEST]);
    let client = client_for(&upstream, 3, 1000).await;

    let result = client.lookup("http://example.com/").await;

    assert!(matches!(result, Err(ComputationError::UpstreamUnavailable(_))));
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_timeout_is_upstream_unavailable() {
    let upstream = Upstream::answering(json!({})).delayed(Duration::from_millis(500));
    let client = client_for(&upstream, 0, 50).await;

    let result = client.lookup("http://slow.example/").await;

    assert!(matches!(result, Err(ComputationError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn test_unreachable_upstream_is_unavailable() {
    let client = SafeBrowsingClient::new(SafeBrowsingSettings {
        api_key: "test-key".to_string(),
        endpoint: "http://127.0.0.1:1/find".to_string(),
        client_id: "url-guard-tests".to_string(),
        timeout: Duration::from_millis(500),
        retries: 1,
    })
    .unwrap();

    let result = client.lookup("http://example.com/").await;

    assert!(matches!(result, Err(ComputationError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn test_transport_errors_do_not_reveal_api_key() {
    let client = SafeBrowsingClient::new(SafeBrowsingSettings {
        api_key: "SUPER-SECRET-KEY".to_string(),
        endpoint: "http://127.0.0.1:1/find".to_string(),
        client_id: "url-guard-tests".to_string(),
        timeout: Duration::from_millis(500),
        retries: 0,
    })
    .unwrap();

    let result = client.lookup("http://example.com/").await;

    match result {
        Err(ComputationError::UpstreamUnavailable(reason)) => {
            assert!(!reason.contains("SUPER-SECRET-KEY"), "leaked: {}", reason);
            assert!(!reason.contains("127.0.0.1:1"), "leaked: {}", reason);
        }
        other => panic!("expected upstream failure, got {:?}", other),
    }
}
