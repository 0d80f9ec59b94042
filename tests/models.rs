mod common;

use astrolabe::models::{
    FetchProgress, FetchStatus, HealthSummary, RateLimitState, RepoHealth, StarredRepo,
};
use common::repo;

#[test]
fn test_progress_constructors() {
    let idle = FetchProgress::default();
    assert_eq!(idle, FetchProgress::idle());
    assert_eq!(idle.status, FetchStatus::Idle);
    assert_eq!(idle.loaded, 0);
    assert_eq!(idle.total, None);

    let loading = FetchProgress::loading(300, Some(800));
    assert_eq!(loading.status, FetchStatus::Loading);
    assert_eq!((loading.loaded, loading.total), (300, Some(800)));

    let done = FetchProgress::done(42);
    assert_eq!(done.status, FetchStatus::Done);
    assert_eq!((done.loaded, done.total), (42, Some(42)));
    assert!(done.error.is_none());
}

#[test]
fn test_failed_keeps_counts() {
    let failed = FetchProgress::loading(200, Some(500)).failed("page 3 exploded");

    assert_eq!(failed.status, FetchStatus::Error);
    assert_eq!((failed.loaded, failed.total), (200, Some(500)));
    assert_eq!(failed.error.as_deref(), Some("page 3 exploded"));
}

#[test]
fn test_progress_serialization() {
    let json = serde_json::to_value(FetchProgress::loading(100, None)).unwrap();
    assert_eq!(json["status"], "loading");
    assert_eq!(json["total"], serde_json::Value::Null);
    assert!(json.get("error").is_none());
}

#[test]
fn test_health_parsing_and_display() {
    assert_eq!("Stale".parse::<RepoHealth>(), Ok(RepoHealth::Stale));
    assert_eq!("archived".parse::<RepoHealth>(), Ok(RepoHealth::Archived));
    assert!("dormant".parse::<RepoHealth>().is_err());

    assert_eq!(RepoHealth::Abandoned.to_string(), "abandoned");
    assert_eq!(serde_json::to_string(&RepoHealth::Active).unwrap(), "\"active\"");
}

#[test]
fn test_health_summary_record() {
    let mut summary = HealthSummary::default();
    for health in [
        RepoHealth::Active,
        RepoHealth::Active,
        RepoHealth::Stale,
        RepoHealth::Archived,
    ] {
        summary.record(health);
    }

    assert_eq!(summary.active, 2);
    assert_eq!(summary.stale, 1);
    assert_eq!(summary.abandoned, 0);
    assert_eq!(summary.archived, 1);
    assert_eq!(summary.total, 4);
}

#[test]
fn test_starred_repo_serialization() {
    let original = repo(5, Some("Go"));
    let json = serde_json::to_string(&original).unwrap();
    let parsed: StarredRepo = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, original);

    let mut unstarred = repo(6, None);
    unstarred.starred_at = None;
    let value = serde_json::to_value(&unstarred).unwrap();
    assert!(value.get("starred_at").is_none());
    assert_eq!(unstarred.starred_or_created(), unstarred.created_at);
}

#[test]
fn test_rate_limit_default() {
    let state = RateLimitState::default();
    assert_eq!(state.remaining, 60);
    assert_eq!(state.limit, 60);
    assert!(!state.is_limited);
}
