//! Turns single-page fetches into one bounded collection run.
//!
//! Page 1 is fetched alone to learn whether more data exists and how many
//! pages the `Link` header advertises. The remaining pages are fetched in
//! fixed-width batches; each batch's results are applied in page order, so
//! the accumulated list never depends on network timing.

use std::collections::HashSet;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{Result, StarsError};
use crate::github::{PageFetcher, PER_PAGE};
use crate::models::{FetchProgress, StarredRepo};

pub const DEFAULT_CAP: usize = 1000;
/// Requests in flight per batch
pub const BATCH_SIZE: usize = 3;

/// Receives progress snapshots from a collection run, in order.
pub trait ProgressSink {
    fn report(&mut self, progress: FetchProgress);
}

impl<F> ProgressSink for F
where
    F: FnMut(FetchProgress),
{
    fn report(&mut self, progress: FetchProgress) {
        self(progress)
    }
}

/// Forwards snapshots into a channel; a dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::UnboundedSender<FetchProgress>);

impl ProgressSink for ChannelSink {
    fn report(&mut self, progress: FetchProgress) {
        let _ = self.0.send(progress);
    }
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Hard upper bound on returned repositories
    pub cap: usize,
    pub batch_size: usize,
}

impl CollectOptions {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            ..Self::default()
        }
    }

    /// Pages needed to reach the cap, saturating at `u32::MAX`
    pub fn max_pages(&self) -> u32 {
        u32::try_from(self.cap.div_ceil(PER_PAGE)).unwrap_or(u32::MAX)
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            batch_size: BATCH_SIZE,
        }
    }
}

/// Remembers the last snapshot so a failure can be reported against it.
struct Reporter<P> {
    sink: P,
    last: FetchProgress,
}

impl<P: ProgressSink> Reporter<P> {
    fn emit(&mut self, progress: FetchProgress) {
        self.last = progress.clone();
        self.sink.report(progress);
    }
}

/// Collects up to `options.cap` starred repositories for `username`.
///
/// Progress goes to `progress` as full snapshots: loading at start, after
/// page 1, after every batch, then done. A failed run ends with an error
/// snapshot and returns the error; no partial list is returned. A cancelled
/// run returns `StarsError::Cancelled` without an error snapshot.
pub async fn collect<F, P>(
    fetcher: &F,
    username: &str,
    progress: P,
    cancel: &CancelToken,
    options: &CollectOptions,
) -> Result<Vec<StarredRepo>>
where
    F: PageFetcher + ?Sized,
    P: ProgressSink,
{
    let mut reporter = Reporter {
        sink: progress,
        last: FetchProgress::loading(0, None),
    };
    reporter.emit(FetchProgress::loading(0, None));

    match run(fetcher, username, &mut reporter, cancel, options).await {
        Ok(repos) => {
            info!(username, count = repos.len(), "Collected starred repositories");
            reporter.emit(FetchProgress::done(repos.len()));
            Ok(repos)
        }
        Err(StarsError::Cancelled) => {
            debug!(username, "Star collection cancelled");
            Err(StarsError::Cancelled)
        }
        Err(e) => {
            warn!(username, "Star collection failed: {}", e);
            let failed = reporter.last.clone().failed(e.to_string());
            reporter.emit(failed);
            Err(e)
        }
    }
}

async fn run<F, P>(
    fetcher: &F,
    username: &str,
    reporter: &mut Reporter<P>,
    cancel: &CancelToken,
    options: &CollectOptions,
) -> Result<Vec<StarredRepo>>
where
    F: PageFetcher + ?Sized,
    P: ProgressSink,
{
    if options.cap == 0 {
        return Err(StarsError::InvalidCap(options.cap));
    }
    let cap = options.cap;
    let batch_size = options.batch_size.max(1) as u32;

    cancel.check()?;
    let first = fetcher.fetch_page(username, 1, cancel).await?;

    let max_pages = options.max_pages();
    let pages_to_fetch = first.last_page.map_or(max_pages, |last| last.min(max_pages));
    let total = (pages_to_fetch as usize).saturating_mul(PER_PAGE).min(cap);

    let mut repos = first.repos;
    reporter.emit(FetchProgress::loading(repos.len().min(cap), Some(total)));

    if first.has_more && repos.len() < cap {
        let mut next = 2;
        while next <= pages_to_fetch {
            cancel.check()?;

            let end = next.saturating_add(batch_size - 1).min(pages_to_fetch);
            debug!(username, from = next, to = end, "Fetching page batch");

            let requests = (next..=end).map(|page| fetcher.fetch_page(username, page, cancel));
            let results = cancel.run(join_all(requests)).await?;

            // join_all keeps submission order, which is page order
            let mut reached_end = false;
            for page in results {
                let page = page?;
                repos.extend(page.repos);
                if !page.has_more {
                    reached_end = true;
                }
            }

            reporter.emit(FetchProgress::loading(repos.len().min(cap), Some(total)));

            if reached_end || repos.len() >= cap || end == pages_to_fetch {
                break;
            }
            next = end + 1;
        }
    }

    dedup_by_id(&mut repos);
    repos.truncate(cap);
    Ok(repos)
}

/// Drops repeated ids, keeping the first occurrence.
fn dedup_by_id(repos: &mut Vec<StarredRepo>) {
    let mut seen = HashSet::with_capacity(repos.len());
    let before = repos.len();
    repos.retain(|repo| seen.insert(repo.id));
    if repos.len() != before {
        debug!(dropped = before - repos.len(), "Dropped duplicate repositories");
    }
}
