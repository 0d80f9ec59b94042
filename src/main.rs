use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use astrolabe::auth::StaticToken;
use astrolabe::cache::{ttl_from_minutes, FileCache, StarCache};
use astrolabe::cli::{Cli, OutputFormat};
use astrolabe::collector::CollectOptions;
use astrolabe::export::{to_csv, to_json};
use astrolabe::github::GitHubClient;
use astrolabe::models::{FetchProgress, FetchStatus};
use astrolabe::query::RepoQuery;
use astrolabe::report::render_report;
use astrolabe::session::StarSession;
use astrolabe::stats::derive_stats_at;
use astrolabe::StarsError;
use chrono::Utc;
use clap::Parser;
use colored::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr so exported data on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = Arc::new(StaticToken::new(cli.token.clone()));
    let client = GitHubClient::with_base_url(&cli.api_url, credentials)
        .context("Failed to create GitHub client")?;

    let mut session = StarSession::new(client, CollectOptions::with_cap(cli.cap));
    if !cli.no_cache {
        let dir = cli
            .cache_dir
            .clone()
            .or_else(FileCache::default_dir)
            .context("No cache directory available; pass --cache-dir or --no-cache")?;
        let ttl = ttl_from_minutes(cli.cache_ttl_minutes).with_context(|| {
            format!("Cache TTL out of range: {} minutes", cli.cache_ttl_minutes)
        })?;
        info!(dir = %dir.display(), ttl_minutes = cli.cache_ttl_minutes, "Using file cache");
        let cache: Arc<dyn StarCache> = Arc::new(FileCache::new(dir, ttl));
        session = session.with_cache(cache);
    }

    eprintln!("{} {}", "Collecting stars for".dimmed(), cli.username.bold());

    let result = tokio::select! {
        result = session.load(&cli.username, cli.refresh, print_progress) => result,
        _ = tokio::signal::ctrl_c() => Err(StarsError::Cancelled),
    };
    eprintln!();

    let repos = match result {
        Ok(repos) => repos,
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", "Cancelled".yellow());
            return Ok(());
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            eprintln!("{}", "Run the command again to retry.".dimmed());
            std::process::exit(1);
        }
    };

    let now = Utc::now();
    let query = RepoQuery {
        search: cli.search.clone(),
        health: cli.health,
        language: cli.language.clone(),
        sort: cli.sort,
    };
    let listed = query.apply(&repos, now);

    match cli.format {
        OutputFormat::Json => println!("{}", to_json(listed.iter().copied())?),
        OutputFormat::Csv => println!("{}", to_csv(listed.iter().copied())),
        OutputFormat::Text => {
            let stats = derive_stats_at(&repos, now);
            let shown: Vec<_> = listed.iter().copied().take(cli.limit).collect();
            print!("{}", render_report(&cli.username, repos.len(), &stats, &shown, now));
            if listed.len() > shown.len() {
                println!(
                    "  {}",
                    format!("… {} more (use --limit to show more)", listed.len() - shown.len()).dimmed()
                );
            }
        }
    }

    Ok(())
}

fn print_progress(progress: FetchProgress) {
    let mut stderr = std::io::stderr();
    match (progress.status, progress.total) {
        (FetchStatus::Loading, Some(total)) => {
            let _ = write!(stderr, "\r  {} / {} repositories", progress.loaded, total);
        }
        (FetchStatus::Loading, None) => {
            let _ = write!(stderr, "\r  {} repositories", progress.loaded);
        }
        (FetchStatus::Done, _) => {
            let _ = write!(stderr, "\r  {} {} repositories", "✓".green(), progress.loaded);
        }
        (FetchStatus::Error, _) | (FetchStatus::Idle, _) => {}
    }
    let _ = stderr.flush();
}
