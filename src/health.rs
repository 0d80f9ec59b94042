use chrono::{DateTime, Utc};

use crate::models::{RepoHealth, StarredRepo};

/// Repos not pushed in this many days are stale
pub const STALE_DAYS: i64 = 365;
/// Repos not pushed in this many days are abandoned
pub const ABANDONED_DAYS: i64 = 365 * 2;

/// Whole days from `then` to `now`, rounded toward negative infinity.
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_seconds().div_euclid(86_400)
}

/// Classifies a repo against the current wall clock.
pub fn classify(repo: &StarredRepo) -> RepoHealth {
    classify_at(repo, Utc::now())
}

/// Archived wins over push recency; otherwise the age of the last push decides.
pub fn classify_at(repo: &StarredRepo, now: DateTime<Utc>) -> RepoHealth {
    if repo.archived {
        return RepoHealth::Archived;
    }

    let days = days_since(repo.pushed_at, now);
    if days >= ABANDONED_DAYS {
        RepoHealth::Abandoned
    } else if days >= STALE_DAYS {
        RepoHealth::Stale
    } else {
        RepoHealth::Active
    }
}
