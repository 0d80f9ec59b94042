use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::StarredRepo;

const CSV_HEADERS: [&str; 11] = [
    "Name",
    "URL",
    "Description",
    "Language",
    "Stars",
    "Forks",
    "Topics",
    "Archived",
    "Starred At",
    "Last Pushed",
    "Created At",
];

/// Shape of one exported repository
#[derive(Debug, Serialize)]
struct ExportedRepo<'a> {
    name: &'a str,
    url: &'a str,
    description: Option<&'a str>,
    language: Option<&'a str>,
    stars: u32,
    forks: u32,
    topics: &'a [String],
    archived: bool,
    starred_at: Option<DateTime<Utc>>,
    pushed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a StarredRepo> for ExportedRepo<'a> {
    fn from(repo: &'a StarredRepo) -> Self {
        ExportedRepo {
            name: &repo.full_name,
            url: &repo.html_url,
            description: repo.description.as_deref(),
            language: repo.language.as_deref(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            topics: &repo.topics,
            archived: repo.archived,
            starred_at: repo.starred_at,
            pushed_at: repo.pushed_at,
            created_at: repo.created_at,
        }
    }
}

pub fn to_json<'a, I>(repos: I) -> Result<String>
where
    I: IntoIterator<Item = &'a StarredRepo>,
{
    let data: Vec<ExportedRepo> = repos.into_iter().map(ExportedRepo::from).collect();
    Ok(serde_json::to_string_pretty(&data)?)
}

pub fn to_csv<'a, I>(repos: I) -> String
where
    I: IntoIterator<Item = &'a StarredRepo>,
{
    let mut lines = vec![CSV_HEADERS.join(",")];
    for repo in repos {
        let row = [
            escape_csv_field(&repo.full_name),
            escape_csv_field(&repo.html_url),
            escape_csv_field(repo.description.as_deref().unwrap_or("")),
            escape_csv_field(repo.language.as_deref().unwrap_or("")),
            repo.stargazers_count.to_string(),
            repo.forks_count.to_string(),
            escape_csv_field(&repo.topics.join(", ")),
            if repo.archived { "Yes" } else { "No" }.to_string(),
            repo.starred_at.map(format_date).unwrap_or_default(),
            format_date(repo.pushed_at),
            format_date(repo.created_at),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}
