use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::*;

use crate::health::{classify_at, days_since};
use crate::models::{DerivedStats, RepoHealth, StarredRepo};

const BAR_WIDTH: usize = 30;
const TIMELINE_MONTHS: usize = 12;

/// `1234` → `1.2k`
pub fn format_count(n: u32) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = days_since(then, now).max(0);
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 30 => format!("{}d ago", d),
        d if d < 365 => format!("{}mo ago", d / 30),
        d => format!("{}y ago", d / 365),
    }
}

fn health_label(health: RepoHealth) -> ColoredString {
    match health {
        RepoHealth::Active => health.as_str().green(),
        RepoHealth::Stale => health.as_str().yellow(),
        RepoHealth::Abandoned => health.as_str().red(),
        RepoHealth::Archived => health.as_str().dimmed(),
    }
}

/// Dashboard-style text summary of a collection and its stats.
///
/// `listed` is the already filtered and sorted slice of repos to print.
pub fn render_report(
    username: &str,
    total: usize,
    stats: &DerivedStats,
    listed: &[&StarredRepo],
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", username.bold().green(), format!("starred {} repositories", total).bold());
    let _ = writeln!(out, "{}", "=".repeat(50).dimmed());

    let _ = writeln!(out, "\n{}", "Languages".bold());
    for stat in &stats.language_stats {
        let filled = (stat.percentage as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
        let _ = writeln!(
            out,
            "  {:<14} {} {:>5} {:>4}%",
            stat.language,
            format!("{:<width$}", "█".repeat(filled), width = BAR_WIDTH).cyan(),
            stat.count,
            stat.percentage,
        );
    }

    let _ = writeln!(out, "\n{}", "Timeline".bold());
    let skip = stats.timeline.len().saturating_sub(TIMELINE_MONTHS);
    if skip > 0 {
        let _ = writeln!(out, "  {}", format!("… {} earlier months", skip).dimmed());
    }
    for entry in stats.timeline.iter().skip(skip) {
        let _ = writeln!(out, "  {}  +{:<5} {:>6}", entry.month, entry.count, entry.cumulative);
    }

    let health = &stats.health_summary;
    let _ = writeln!(out, "\n{}", "Health".bold());
    let _ = writeln!(
        out,
        "  {} {}  {} {}  {} {}  {} {}  (total {})",
        health_label(RepoHealth::Active),
        health.active,
        health_label(RepoHealth::Stale),
        health.stale,
        health_label(RepoHealth::Abandoned),
        health.abandoned,
        health_label(RepoHealth::Archived),
        health.archived,
        health.total,
    );

    if !listed.is_empty() {
        let _ = writeln!(out, "\n{}", "Repositories".bold());
        for repo in listed {
            let _ = writeln!(
                out,
                "  {} {} {} {} {}",
                repo.full_name.bold(),
                format!("★ {}", format_count(repo.stargazers_count)).yellow(),
                repo.language.as_deref().unwrap_or("-").cyan(),
                health_label(classify_at(repo, now)),
                format!("pushed {}", time_ago(repo.pushed_at, now)).dimmed(),
            );
            if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "    {}", description.dimmed());
            }
        }
    }

    out
}
