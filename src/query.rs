use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::classify_at;
use crate::models::{RepoHealth, StarredRepo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Most recently starred first
    #[default]
    StarredAt,
    /// Most recently pushed first
    PushedAt,
    /// Most stargazers first
    Stars,
    /// Full name, A to Z
    Name,
}

/// Filters and ordering for browsing a star list
#[derive(Debug, Clone, Default)]
pub struct RepoQuery {
    pub search: Option<String>,
    pub health: Option<RepoHealth>,
    pub language: Option<String>,
    pub sort: SortField,
}

impl RepoQuery {
    pub fn matches(&self, repo: &StarredRepo, now: DateTime<Utc>) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = repo.full_name.to_lowercase().contains(&needle)
                || repo
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || repo.topics.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(health) = self.health {
            if classify_at(repo, now) != health {
                return false;
            }
        }

        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            if repo.language.as_deref() != Some(language) {
                return false;
            }
        }

        true
    }

    /// Matching repos in the requested order. Ties keep input order.
    pub fn apply<'a>(&self, repos: &'a [StarredRepo], now: DateTime<Utc>) -> Vec<&'a StarredRepo> {
        let mut result: Vec<&StarredRepo> = repos.iter().filter(|r| self.matches(r, now)).collect();

        match self.sort {
            SortField::StarredAt => {
                result.sort_by(|a, b| b.starred_or_created().cmp(&a.starred_or_created()))
            }
            SortField::PushedAt => result.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at)),
            SortField::Stars => result.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
            SortField::Name => result.sort_by(|a, b| {
                a.full_name
                    .to_lowercase()
                    .cmp(&b.full_name.to_lowercase())
                    .then_with(|| a.full_name.cmp(&b.full_name))
            }),
        }

        result
    }
}

/// Languages present in `repos`, most frequent first.
pub fn languages_by_frequency(repos: &[StarredRepo]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        *counts.entry(language).or_insert(0) += 1;
    }

    let mut languages: Vec<(&str, usize)> = counts.into_iter().collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    languages.into_iter().map(|(language, _)| language.to_string()).collect()
}
