mod common;

use common::CountingComputation;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use std::sync::Arc;
use url_guard::application::services::{ReputationLookup, ResolutionCache};
use url_guard::domain::computation::ComputationError;
use url_guard::domain::entities::ReputationVerdict;
use url_guard::infrastructure::cache::NullCache;
use url_guard::infrastructure::metrics::{CapturingSink, MetricsRecorderSink, names};

fn reputation_cache() -> (ResolutionCache<ReputationVerdict>, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::new());
    (
        ResolutionCache::new("reputation", common::memory_store(), sink.clone()),
        sink,
    )
}

#[tokio::test]
async fn test_second_computation_never_runs() {
    let (cache, _sink) = reputation_cache();
    let first = CountingComputation::ok(ReputationVerdict::Safe);
    let second = CountingComputation::ok(ReputationVerdict::from_threats(["MALWARE"]));

    let key = "http://example.com/";
    assert_eq!(cache.resolve(key, &first).await, Ok(ReputationVerdict::Safe));
    assert_eq!(cache.resolve(key, &second).await, Ok(ReputationVerdict::Safe));

    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn test_upstream_failure_stores_nothing() {
    let (cache, sink) = reputation_cache();
    let failing = CountingComputation::<ReputationVerdict>::err(
        ComputationError::UpstreamUnavailable("timeout".to_string()),
    );

    let key = "http://evil.example";
    let result = cache.resolve(key, &failing).await;

    assert_eq!(
        result,
        Err(ComputationError::UpstreamUnavailable("timeout".to_string()))
    );
    assert_eq!(cache.peek(key).await, None);
    assert_eq!(sink.counter(names::RESOLUTION_CACHE_MISS), 1);
    assert_eq!(sink.timings(names::RESOLUTION_CACHE_MISS_MS).len(), 1);

    let recovered = CountingComputation::ok(ReputationVerdict::Safe);
    assert_eq!(
        cache.resolve(key, &recovered).await,
        Ok(ReputationVerdict::Safe)
    );
    assert_eq!(recovered.calls(), 1);
}

#[tokio::test]
async fn test_reputation_lookup_through_cache() {
    let provider = common::StubProvider::flagged("MALWARE");
    let (cache, sink) = reputation_cache();
    let url = "http://evil.example/";

    for _ in 0..3 {
        let lookup = ReputationLookup::new(url, provider.clone(), sink.clone());
        let verdict = cache.resolve(url, &lookup).await.unwrap();
        assert!(!verdict.is_safe());
    }

    assert_eq!(provider.calls(), 1);
    assert_eq!(sink.counter(names::SAFEBROWSING_QUERY), 1);
    assert_eq!(sink.counter(names::RESOLUTION_CACHE_HIT), 2);

    let miss_timings: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| e.name() == names::RESOLUTION_CACHE_MISS_MS)
        .collect();
    assert_eq!(miss_timings.len(), 1);
    assert_eq!(miss_timings[0].tag("computation"), Some("safebrowsing"));
    assert_eq!(miss_timings[0].tag("cache"), Some("reputation"));
}

#[tokio::test]
async fn test_disabled_store_always_computes() {
    let sink = Arc::new(CapturingSink::new());
    let cache: ResolutionCache<u32> =
        ResolutionCache::new("numbers", Arc::new(NullCache::new()), sink.clone());
    let computation = CountingComputation::ok(5u32);

    cache.resolve("k", &computation).await.unwrap();
    cache.resolve("k", &computation).await.unwrap();

    assert_eq!(computation.calls(), 2);
    assert_eq!(sink.counter(names::RESOLUTION_CACHE_HIT), 0);
    assert_eq!(sink.counter(names::RESOLUTION_CACHE_MISS), 2);
}

#[tokio::test]
async fn test_concurrent_misses_on_same_key_each_compute() {
    let (cache, _sink) = reputation_cache();
    let computation = CountingComputation::ok(ReputationVerdict::Safe).with_delay(50);

    let (a, b) = tokio::join!(
        cache.resolve("http://burst.example/", &computation),
        cache.resolve("http://burst.example/", &computation),
    );

    assert_eq!(a, Ok(ReputationVerdict::Safe));
    assert_eq!(b, Ok(ReputationVerdict::Safe));
    assert_eq!(computation.calls(), 2);
    assert_eq!(cache.peek("http://burst.example/").await, Some(ReputationVerdict::Safe));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_keys() {
    let (cache, sink) = reputation_cache();
    let cache = Arc::new(cache);
    let computation = Arc::new(CountingComputation::ok(ReputationVerdict::Safe).with_delay(10));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let cache = cache.clone();
            let computation = computation.clone();
            tokio::spawn(async move {
                let key = format!("http://host{}.example/", i);
                cache.resolve(&key, computation.as_ref()).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(ReputationVerdict::Safe));
    }

    assert_eq!(computation.calls(), 16);
    assert_eq!(sink.counter(names::RESOLUTION_CACHE_MISS), 16);

    for i in 0..16 {
        let key = format!("http://host{}.example/", i);
        assert_eq!(cache.peek(&key).await, Some(ReputationVerdict::Safe));
    }
}

#[test]
fn test_recorder_sink_receives_cache_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        runtime.block_on(async {
            let cache: ResolutionCache<u32> = ResolutionCache::new(
                "numbers",
                common::memory_store(),
                Arc::new(MetricsRecorderSink::new()),
            );
            let computation = CountingComputation::ok(1u32).with_kind("counting");

            cache.resolve("k", &computation).await.unwrap();
            cache.resolve("k", &computation).await.unwrap();
        });
    });

    let snapshot = snapshotter.snapshot().into_vec();

    let value_of = |name: &str| {
        snapshot
            .iter()
            .find(|(key, _, _, _)| key.key().name() == name)
            .map(|(_, _, _, value)| value)
    };

    assert!(matches!(
        value_of(names::RESOLUTION_CACHE_HIT),
        Some(DebugValue::Counter(1))
    ));
    assert!(matches!(
        value_of(names::RESOLUTION_CACHE_MISS),
        Some(DebugValue::Counter(1))
    ));
    match value_of(names::RESOLUTION_CACHE_MISS_MS) {
        Some(DebugValue::Histogram(samples)) => assert_eq!(samples.len(), 1),
        other => panic!("expected histogram, got {:?}", other),
    }
}
