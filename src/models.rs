use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository starred by the viewed user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarredRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub open_issues_count: u32,
    pub archived: bool,
    pub pushed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub owner: RepoOwner,
    /// When the user starred the repo; absent if the API omitted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_at: Option<DateTime<Utc>>,
}

impl StarredRepo {
    /// Star timestamp, falling back to the creation timestamp.
    pub fn starred_or_created(&self) -> DateTime<Utc> {
        self.starred_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Loading,
    Done,
    Error,
}

/// Snapshot of a collection run. Each report is a full snapshot, never a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchProgress {
    pub loaded: usize,
    pub total: Option<usize>,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchProgress {
    pub fn idle() -> Self {
        Self {
            loaded: 0,
            total: None,
            status: FetchStatus::Idle,
            error: None,
        }
    }

    pub fn loading(loaded: usize, total: Option<usize>) -> Self {
        Self {
            loaded,
            total,
            status: FetchStatus::Loading,
            error: None,
        }
    }

    pub fn done(count: usize) -> Self {
        Self {
            loaded: count,
            total: Some(count),
            status: FetchStatus::Done,
            error: None,
        }
    }

    /// Marks this snapshot as failed, keeping its counts.
    pub fn failed(self, message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Error,
            error: Some(message.into()),
            ..self
        }
    }
}

impl Default for FetchProgress {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoHealth {
    Active,
    Stale,
    Abandoned,
    Archived,
}

impl RepoHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoHealth::Active => "active",
            RepoHealth::Stale => "stale",
            RepoHealth::Abandoned => "abandoned",
            RepoHealth::Archived => "archived",
        }
    }
}

impl std::fmt::Display for RepoHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepoHealth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(RepoHealth::Active),
            "stale" => Ok(RepoHealth::Stale),
            "abandoned" => Ok(RepoHealth::Abandoned),
            "archived" => Ok(RepoHealth::Archived),
            other => Err(format!("unknown health category: {}", other)),
        }
    }
}

/// One entry of the language breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub language: String,
    pub count: usize,
    pub percentage: u32,
    pub color: String,
}

/// One calendar month of the star timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarTimelineEntry {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    pub cumulative: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub active: usize,
    pub stale: usize,
    pub abandoned: usize,
    pub archived: usize,
    pub total: usize,
}

impl HealthSummary {
    pub fn record(&mut self, health: RepoHealth) {
        match health {
            RepoHealth::Active => self.active += 1,
            RepoHealth::Stale => self.stale += 1,
            RepoHealth::Abandoned => self.abandoned += 1,
            RepoHealth::Archived => self.archived += 1,
        }
        self.total += 1;
    }
}

/// Everything derived from a completed collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub language_stats: Vec<LanguageStat>,
    pub timeline: Vec<StarTimelineEntry>,
    pub health_summary: HealthSummary,
}

/// Rate limit state parsed from the last response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        // Unauthenticated ceiling
        Self {
            remaining: 60,
            limit: 60,
            reset_time: chrono::Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}
