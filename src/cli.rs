use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::cache::{DEFAULT_TTL_MINUTES, MAX_TTL_MINUTES};
use crate::collector::DEFAULT_CAP;
use crate::github::API_BASE_URL;
use crate::models::RepoHealth;
use crate::query::SortField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "astrolabe")]
#[command(about = "Astrolabe - Explore a GitHub user's starred repositories")]
#[command(version)]
pub struct Cli {
    /// GitHub username whose stars to collect
    pub username: String,

    /// GitHub token, raises the rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum number of repositories to collect
    #[arg(long, env = "ASTROLABE_CAP", default_value_t = DEFAULT_CAP,
          value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub cap: usize,

    /// Ignore any cached result and fetch again
    #[arg(long)]
    pub refresh: bool,

    /// Neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Cache directory (defaults to the platform cache dir)
    #[arg(long, env = "ASTROLABE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Minutes a cached result stays valid
    #[arg(long, env = "ASTROLABE_CACHE_TTL", default_value_t = DEFAULT_TTL_MINUTES,
          value_parser = clap::builder::RangedI64ValueParser::<i64>::new().range(0..=MAX_TTL_MINUTES))]
    pub cache_ttl_minutes: i64,

    /// Only list repos whose name, description or topics contain this text
    #[arg(long)]
    pub search: Option<String>,

    /// Only list repos in this language
    #[arg(long)]
    pub language: Option<String>,

    /// Only list repos in this health category (active, stale, abandoned, archived)
    #[arg(long)]
    pub health: Option<RepoHealth>,

    /// Order of listed repos
    #[arg(long, value_enum, default_value_t = SortField::StarredAt)]
    pub sort: SortField,

    /// Number of repos listed in the text report
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,
}
