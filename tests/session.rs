mod common;

use std::sync::Arc;
use std::time::Duration;

use astrolabe::cache::{MemoryCache, StarCache};
use astrolabe::collector::CollectOptions;
use astrolabe::error::StarsError;
use astrolabe::models::{FetchProgress, FetchStatus};
use astrolabe::session::StarSession;
use common::{recorder, repos, MockFetcher};

fn no_progress(_: FetchProgress) {}

#[tokio::test(start_paused = true)]
async fn test_load_collects_and_fills_cache() {
    let fetcher = Arc::new(MockFetcher::with_sizes(&[100, 20]));
    let cache = Arc::new(MemoryCache::default());
    let session = StarSession::new(Arc::clone(&fetcher), CollectOptions::default())
        .with_cache(cache.clone());

    assert_eq!(session.progress().status, FetchStatus::Idle);

    let loaded = session.load("Octocat", false, no_progress).await.expect("load failed");

    assert_eq!(loaded.len(), 120);
    assert_eq!(session.progress(), FetchProgress::done(120));
    assert_eq!(session.repos().len(), 120);
    assert_eq!(session.username().as_deref(), Some("Octocat"));
    assert_eq!(cache.get("octocat").map(|r| r.len()), Some(120));
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_skips_fetcher() {
    let fetcher = Arc::new(MockFetcher::with_sizes(&[100, 20]));
    let cache = Arc::new(MemoryCache::default());
    cache.set("octocat", &repos(1, 7));
    let session =
        StarSession::new(Arc::clone(&fetcher), CollectOptions::default()).with_cache(cache);
    let (events, sink) = recorder();

    let loaded = session.load("OCTOCAT", false, sink).await.expect("load failed");

    assert_eq!(loaded.len(), 7);
    assert!(fetcher.calls().is_empty());
    assert_eq!(*events.lock().unwrap(), vec![FetchProgress::done(7)]);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_bypasses_cache() {
    let fetcher = Arc::new(MockFetcher::with_sizes(&[30]));
    let cache = Arc::new(MemoryCache::default());
    cache.set("octocat", &repos(1000, 7));
    let session = StarSession::new(Arc::clone(&fetcher), CollectOptions::default())
        .with_cache(cache.clone());

    let loaded = session.load("octocat", true, no_progress).await.expect("load failed");

    assert_eq!(loaded.len(), 30);
    assert_eq!(fetcher.calls(), vec![1]);
    // Fresh result replaces the cached snapshot
    assert_eq!(cache.get("octocat").map(|r| r.len()), Some(30));
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_reports_error_state() {
    let fetcher = MockFetcher::with_sizes(&[100, 100]).fail_on(2);
    let cache = Arc::new(MemoryCache::default());
    let session = StarSession::new(fetcher, CollectOptions::default()).with_cache(cache.clone());

    let result = session.load("octocat", false, no_progress).await;

    assert!(matches!(result, Err(StarsError::ApiError(_))));
    let progress = session.progress();
    assert_eq!(progress.status, FetchStatus::Error);
    assert!(progress.error.is_some());
    assert!(session.repos().is_empty());
    assert!(cache.get("octocat").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reload_fetches_last_username_again() {
    let fetcher = Arc::new(MockFetcher::with_sizes(&[10]));
    let session = StarSession::new(Arc::clone(&fetcher), CollectOptions::default())
        .with_cache(Arc::new(MemoryCache::default()));

    session.load("octocat", false, no_progress).await.expect("load failed");
    session.reload(no_progress).await.expect("reload failed");

    assert_eq!(fetcher.calls(), vec![1, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_reload_without_load_is_rejected() {
    let session = StarSession::new(MockFetcher::with_sizes(&[10]), CollectOptions::default());

    let result = session.reload(no_progress).await;
    assert!(matches!(result, Err(StarsError::InvalidUsername(_))));
}

#[tokio::test(start_paused = true)]
async fn test_blank_username_rejected() {
    let session = StarSession::new(MockFetcher::with_sizes(&[10]), CollectOptions::default());

    let result = session.load("   ", false, no_progress).await;
    assert!(matches!(result, Err(StarsError::InvalidUsername(_))));
    assert_eq!(session.progress().status, FetchStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_not_an_error_state() {
    let fetcher = MockFetcher::with_sizes(&[100, 100, 100]).delay(2, Duration::from_secs(30));
    let session = StarSession::new(fetcher, CollectOptions::default());

    let (result, _) = tokio::join!(session.load("octocat", false, no_progress), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        session.cancel();
    });

    assert!(result.expect_err("cancelled load must not succeed").is_cancelled());
    assert_ne!(session.progress().status, FetchStatus::Error);
    assert!(session.repos().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_new_load_supersedes_in_flight_run() {
    let fetcher = MockFetcher::with_sizes(&[100, 100, 40]).delay(2, Duration::from_secs(30));
    let session = StarSession::new(fetcher, CollectOptions::default());

    let (first, second) = tokio::join!(session.load("alice", false, no_progress), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        session.load("bob", false, no_progress).await
    });

    assert!(matches!(first, Err(StarsError::Cancelled)));
    let second = second.expect("second load failed");
    assert_eq!(second.len(), 240);
    assert_eq!(session.username().as_deref(), Some("bob"));
    assert_eq!(session.progress(), FetchProgress::done(240));
}
