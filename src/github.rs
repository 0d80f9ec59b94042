use crate::auth::{authorization_header, CredentialProvider};
use crate::cancel::CancelToken;
use crate::error::{Result, StarsError};
use crate::models::{RateLimitState, StarredRepo};
use crate::types::GitHubStarEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
/// Largest page the starred endpoint serves
pub const PER_PAGE: usize = 100;
/// Media type that adds `starred_at` to every item
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const LOW_RATE_LIMIT: u32 = 10;

/// One page of a user's stars
#[derive(Debug, Clone)]
pub struct StarPage {
    pub repos: Vec<StarredRepo>,
    /// True iff the page was full; a short page ends the data
    pub has_more: bool,
    /// Page number from the `rel="last"` link, if the response had one
    pub last_page: Option<u32>,
    pub rate_limit: Option<RateLimitState>,
}

impl StarPage {
    pub fn new(repos: Vec<StarredRepo>, last_page: Option<u32>) -> Self {
        let has_more = repos.len() == PER_PAGE;
        Self {
            repos,
            has_more,
            last_page,
            rate_limit: None,
        }
    }
}

/// Retrieves single pages of starred repositories.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches 1-based `page` of `username`'s stars, `PER_PAGE` per page.
    async fn fetch_page(&self, username: &str, page: u32, cancel: &CancelToken) -> Result<StarPage>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_page(&self, username: &str, page: u32, cancel: &CancelToken) -> Result<StarPage> {
        (**self).fetch_page(username, page, cancel).await
    }
}

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl GitHubClient {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Self::with_base_url(API_BASE_URL, credentials)
    }

    pub fn with_base_url(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StarsError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StarsError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("astrolabe/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            base_url,
            credentials,
        })
    }

    /// `{base}/users/{username}/starred?per_page=100&page={page}`
    pub fn starred_url(&self, username: &str, page: u32) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StarsError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", username, "starred"]);
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self.client.get(url.clone()).header("Accept", STAR_MEDIA_TYPE);
        if let Some(token) = self.credentials.token() {
            request = request.header("Authorization", authorization_header(&token));
        }

        let response = request.send().await?;
        let rate_limit = parse_rate_limit(response.headers());

        match response.status() {
            status if status.is_success() => {
                if let Some(state) = &rate_limit {
                    if state.remaining < LOW_RATE_LIMIT {
                        warn!(
                            remaining = state.remaining,
                            limit = state.limit,
                            "GitHub rate limit nearly exhausted"
                        );
                    }
                }
                Ok(response)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(StarsError::NotFound(format!("Resource not found: {}", url.path())))
            }
            reqwest::StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await.unwrap_or_default();
                Err(StarsError::AuthError(format!("Bad credentials: {}", error_text)))
            }
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS
                if rate_limit.as_ref().is_some_and(|state| state.is_limited) =>
            {
                let reset = rate_limit.map(|state| state.reset_time).unwrap_or_else(Utc::now);
                Err(StarsError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Resets at {}",
                    reset.to_rfc3339()
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(StarsError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }
}

#[async_trait]
impl PageFetcher for GitHubClient {
    async fn fetch_page(&self, username: &str, page: u32, cancel: &CancelToken) -> Result<StarPage> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StarsError::InvalidUsername(username.to_string()));
        }
        if page == 0 {
            return Err(StarsError::InvalidPage(page));
        }

        let url = self.starred_url(username, page)?;
        debug!(username, page, "Fetching starred page");

        cancel
            .run(async {
                let response = self.make_request(url).await?;
                let rate_limit = parse_rate_limit(response.headers());
                let last_page = response
                    .headers()
                    .get("link")
                    .and_then(|h| h.to_str().ok())
                    .and_then(parse_last_page);

                let body = response.text().await?;
                let entries: Vec<GitHubStarEntry> = serde_json::from_str(&body)?;
                let repos: Vec<StarredRepo> = entries.into_iter().map(StarredRepo::from).collect();

                debug!(username, page, count = repos.len(), ?last_page, "Fetched starred page");

                let mut star_page = StarPage::new(repos, last_page);
                star_page.rate_limit = rate_limit;
                Ok(star_page)
            })
            .await?
    }
}

/// Parse the `rel="last"` page number out of a GitHub Link header.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/1/starred?per_page=100&page=2>; rel="next", <...&page=7>; rel="last"`
pub fn parse_last_page(link_header: &str) -> Option<u32> {
    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some("last")) = (url, rel) {
            return extract_page_from_url(url);
        }
    }

    None
}

fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    url[query_start + 1..]
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

/// Rate limit state from the `X-RateLimit-*` headers, if present
pub fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitState> {
    let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    let remaining = header("X-RateLimit-Remaining")?.parse::<u32>().ok()?;

    let limit = header("X-RateLimit-Limit")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(60);

    let reset_time = header("X-RateLimit-Reset")
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    Some(RateLimitState {
        remaining,
        limit,
        reset_time,
        is_limited: remaining == 0,
    })
}
