//! Aggregates derived from a completed star collection.
//!
//! Every function here is pure: the same repositories and the same `now`
//! always give the same output.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::colors::{language_color, DEFAULT_COLOR, OTHER_LANGUAGE};
use crate::health::classify_at;
use crate::models::{DerivedStats, HealthSummary, LanguageStat, StarTimelineEntry, StarredRepo};

/// Languages shown individually before the rest fold into "Other"
pub const TOP_LANGUAGES: usize = 10;

pub fn derive_stats(repos: &[StarredRepo]) -> DerivedStats {
    derive_stats_at(repos, Utc::now())
}

pub fn derive_stats_at(repos: &[StarredRepo], now: DateTime<Utc>) -> DerivedStats {
    DerivedStats {
        language_stats: language_stats(repos),
        timeline: timeline(repos),
        health_summary: health_summary_at(repos, now),
    }
}

/// Language distribution, largest first, long tail folded into "Other".
pub fn language_stats(repos: &[StarredRepo]) -> Vec<LanguageStat> {
    // First-seen order breaks count ties
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for repo in repos {
        let language = repo.language.as_deref().unwrap_or(OTHER_LANGUAGE);
        match index.get(language) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(language, counts.len());
                counts.push((language, 1));
            }
        }
    }

    let total = repos.len().max(1);
    let mut stats: Vec<LanguageStat> = counts
        .into_iter()
        .map(|(language, count)| LanguageStat {
            language: language.to_string(),
            count,
            percentage: rounded_percentage(count, total),
            color: language_color(language).to_string(),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));

    if stats.len() <= TOP_LANGUAGES {
        return stats;
    }

    let rest = stats.split_off(TOP_LANGUAGES);
    let rest_count: usize = rest.iter().map(|s| s.count).sum();
    let rest_percentage: u32 = rest.iter().map(|s| s.percentage).sum();

    match stats.iter_mut().find(|s| s.language == OTHER_LANGUAGE) {
        Some(other) => {
            other.count += rest_count;
            other.percentage += rest_percentage;
        }
        None => stats.push(LanguageStat {
            language: OTHER_LANGUAGE.to_string(),
            count: rest_count,
            percentage: rest_percentage,
            color: DEFAULT_COLOR.to_string(),
        }),
    }

    stats
}

/// round(100 * count / total), halves rounding up.
fn rounded_percentage(count: usize, total: usize) -> u32 {
    ((200 * count + total) / (2 * total)) as u32
}

/// Stars per UTC month with a running total, oldest month first.
pub fn timeline(repos: &[StarredRepo]) -> Vec<StarTimelineEntry> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for repo in repos {
        let month = repo.starred_or_created().format("%Y-%m").to_string();
        *months.entry(month).or_insert(0) += 1;
    }

    let mut cumulative = 0;
    months
        .into_iter()
        .map(|(month, count)| {
            cumulative += count;
            StarTimelineEntry {
                month,
                count,
                cumulative,
            }
        })
        .collect()
}

pub fn health_summary(repos: &[StarredRepo]) -> HealthSummary {
    health_summary_at(repos, Utc::now())
}

pub fn health_summary_at(repos: &[StarredRepo], now: DateTime<Utc>) -> HealthSummary {
    let mut summary = HealthSummary::default();
    for repo in repos {
        summary.record(classify_at(repo, now));
    }
    summary
}
