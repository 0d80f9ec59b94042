use astrolabe::cache::{DEFAULT_TTL_MINUTES, MAX_TTL_MINUTES};
use astrolabe::cli::{Cli, OutputFormat};
use astrolabe::collector::DEFAULT_CAP;
use astrolabe::models::RepoHealth;
use astrolabe::query::SortField;
use clap::Parser;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("astrolabe").chain(args.iter().copied()))
}

#[test]
fn test_defaults() {
    let cli = parse(&["octocat"]).expect("parse failed");

    assert_eq!(cli.username, "octocat");
    assert_eq!(cli.cap, DEFAULT_CAP);
    assert_eq!(cli.cache_ttl_minutes, DEFAULT_TTL_MINUTES);
    assert_eq!(cli.sort, SortField::StarredAt);
    assert_eq!(cli.format, OutputFormat::Text);
    assert!(!cli.refresh);
}

#[test]
fn test_filters_and_format() {
    let cli = parse(&[
        "octocat", "--health", "stale", "--sort", "pushed-at", "--format", "csv", "--language", "Rust",
    ])
    .expect("parse failed");

    assert_eq!(cli.health, Some(RepoHealth::Stale));
    assert_eq!(cli.sort, SortField::PushedAt);
    assert_eq!(cli.format, OutputFormat::Csv);
    assert_eq!(cli.language.as_deref(), Some("Rust"));
}

#[test]
fn test_cache_ttl_range() {
    let cli = parse(&["octocat", "--cache-ttl-minutes", "0"]).expect("parse failed");
    assert_eq!(cli.cache_ttl_minutes, 0);

    let max = MAX_TTL_MINUTES.to_string();
    let cli = parse(&["octocat", "--cache-ttl-minutes", &max]).expect("parse failed");
    assert_eq!(cli.cache_ttl_minutes, MAX_TTL_MINUTES);

    assert!(parse(&["octocat", "--cache-ttl-minutes=-5"]).is_err());
    assert!(parse(&["octocat", "--cache-ttl-minutes", "525601"]).is_err());
    assert!(parse(&["octocat", "--cache-ttl-minutes", "9223372036854775807"]).is_err());
}

#[test]
fn test_cap_must_be_positive() {
    assert!(parse(&["octocat", "--cap", "0"]).is_err());

    let cli = parse(&["octocat", "--cap", "429496729601"]).expect("parse failed");
    assert_eq!(cli.cap, 429_496_729_601);
}
