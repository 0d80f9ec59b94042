#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use astrolabe::cancel::CancelToken;
use astrolabe::error::{Result, StarsError};
use astrolabe::github::{PageFetcher, StarPage};
use astrolabe::models::{FetchProgress, RepoOwner, StarredRepo};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};

/// Fixed "now" so health and timeline assertions are deterministic
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn repo(id: u64, language: Option<&str>) -> StarredRepo {
    let created = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    StarredRepo {
        id,
        name: format!("repo-{}", id),
        full_name: format!("owner/repo-{}", id),
        html_url: format!("https://github.com/owner/repo-{}", id),
        description: Some(format!("Repository number {}", id)),
        language: language.map(str::to_string),
        stargazers_count: (id % 5000) as u32,
        forks_count: 1,
        open_issues_count: 0,
        archived: false,
        pushed_at: fixed_now() - ChronoDuration::days(10),
        created_at: created,
        updated_at: created,
        topics: vec!["cli".to_string()],
        owner: RepoOwner {
            login: "owner".to_string(),
            avatar_url: "https://github.com/owner.png".to_string(),
            html_url: "https://github.com/owner".to_string(),
        },
        starred_at: Some(Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()),
    }
}

pub fn pushed_days_ago(mut repo: StarredRepo, days: i64) -> StarredRepo {
    repo.pushed_at = fixed_now() - ChronoDuration::days(days);
    repo
}

/// Repos with ids `first_id..first_id + count`
pub fn repos(first_id: u64, count: usize) -> Vec<StarredRepo> {
    (0..count as u64).map(|i| repo(first_id + i, Some("Rust"))).collect()
}

/// Scripted page source: page N serves `pages[N-1]`, pages past the end are empty.
pub struct MockFetcher {
    pages: Vec<Vec<StarredRepo>>,
    last_page: Option<u32>,
    delays: HashMap<u32, Duration>,
    fail_page: Option<u32>,
    calls: Mutex<Vec<u32>>,
}

impl MockFetcher {
    pub fn new(pages: Vec<Vec<StarredRepo>>) -> Self {
        Self {
            pages,
            last_page: None,
            delays: HashMap::new(),
            fail_page: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pages of the given sizes, ids numbered consecutively from 1
    pub fn with_sizes(sizes: &[usize]) -> Self {
        let mut next_id = 1;
        let pages = sizes
            .iter()
            .map(|&size| {
                let page = repos(next_id, size);
                next_id += size as u64;
                page
            })
            .collect();
        Self::new(pages)
    }

    pub fn last_page(mut self, last: u32) -> Self {
        self.last_page = Some(last);
        self
    }

    pub fn delay(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    pub fn fail_on(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }

    pub fn calls(&self) -> Vec<u32> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, username: &str, page: u32, cancel: &CancelToken) -> Result<StarPage> {
        if username.trim().is_empty() {
            return Err(StarsError::InvalidUsername(username.to_string()));
        }
        self.calls.lock().unwrap().push(page);

        let delay = self.delays.get(&page).copied().unwrap_or(Duration::from_millis(10));
        cancel.run(tokio::time::sleep(delay)).await?;

        if self.fail_page == Some(page) {
            return Err(StarsError::ApiError(format!("page {} exploded", page)));
        }

        let repos = self.pages.get(page as usize - 1).cloned().unwrap_or_default();
        Ok(StarPage::new(repos, self.last_page))
    }
}

/// Progress sink that records every snapshot
pub fn recorder() -> (Arc<Mutex<Vec<FetchProgress>>>, impl FnMut(FetchProgress)) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let capture = Arc::clone(&events);
    (events, move |progress| capture.lock().unwrap().push(progress))
}
