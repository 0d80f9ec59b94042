use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{RepoOwner, StarredRepo};

// GitHub API response structures

/// One item of `GET /users/{username}/starred` with the `star+json` media type
#[derive(Debug, Deserialize)]
pub struct GitHubStarEntry {
    pub starred_at: Option<DateTime<Utc>>,
    pub repo: GitHubStarredRepo,
}

#[derive(Debug, Deserialize)]
pub struct GitHubStarredRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub open_issues_count: u32,
    #[serde(default)]
    pub archived: bool,
    /// Null for repositories that never received a push
    pub pushed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub owner: GitHubOwner,
}

#[derive(Debug, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    pub html_url: String,
}

impl From<GitHubStarEntry> for StarredRepo {
    fn from(entry: GitHubStarEntry) -> Self {
        let repo = entry.repo;
        StarredRepo {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
            description: repo.description,
            language: repo.language,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            open_issues_count: repo.open_issues_count,
            archived: repo.archived,
            pushed_at: repo.pushed_at.unwrap_or(repo.created_at),
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            topics: repo.topics,
            owner: RepoOwner {
                login: repo.owner.login,
                avatar_url: repo.owner.avatar_url,
                html_url: repo.owner.html_url,
            },
            starred_at: entry.starred_at,
        }
    }
}
