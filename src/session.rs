use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::cache::StarCache;
use crate::cancel::CancelToken;
use crate::collector::{collect, CollectOptions, ProgressSink};
use crate::error::{Result, StarsError};
use crate::github::PageFetcher;
use crate::models::{FetchProgress, StarredRepo};

#[derive(Debug, Default)]
struct SessionState {
    username: Option<String>,
    repos: Vec<StarredRepo>,
    progress: FetchProgress,
    current: CancelToken,
}

/// Caller-side state for browsing one user's stars at a time.
///
/// Moves idle → loading → done or error once per `load` call. Starting a
/// new load cancels the run in flight, and a cancelled run never writes
/// its results back.
pub struct StarSession<F: PageFetcher> {
    fetcher: F,
    cache: Option<Arc<dyn StarCache>>,
    options: CollectOptions,
    state: Mutex<SessionState>,
}

impl<F: PageFetcher> StarSession<F> {
    pub fn new(fetcher: F, options: CollectOptions) -> Self {
        Self {
            fetcher,
            cache: None,
            options,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn StarCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn progress(&self) -> FetchProgress {
        self.state().progress.clone()
    }

    pub fn repos(&self) -> Vec<StarredRepo> {
        self.state().repos.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.state().username.clone()
    }

    /// Cancels the run in flight, if any.
    pub fn cancel(&self) {
        self.state().current.cancel();
    }

    /// Loads `username`'s stars, from the cache unless `refresh` is set.
    pub async fn load<P: ProgressSink>(
        &self,
        username: &str,
        refresh: bool,
        mut sink: P,
    ) -> Result<Vec<StarredRepo>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StarsError::InvalidUsername(username.to_string()));
        }

        let cancel = {
            let mut state = self.state();
            state.current.cancel();
            state.current = CancelToken::new();
            state.username = Some(username.to_string());
            state.repos.clear();
            state.progress = FetchProgress::loading(0, None);
            state.current.clone()
        };

        if !refresh {
            if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(username)) {
                info!(username, count = cached.len(), "Using cached stars");
                let done = FetchProgress::done(cached.len());
                self.commit(&cancel, &cached, done.clone())?;
                sink.report(done);
                return Ok(cached);
            }
        }

        let result = collect(
            &self.fetcher,
            username,
            |progress: FetchProgress| {
                self.record_progress(&cancel, progress.clone());
                sink.report(progress);
            },
            &cancel,
            &self.options,
        )
        .await;

        let repos = result?;
        self.commit(&cancel, &repos, FetchProgress::done(repos.len()))?;
        if let Some(cache) = &self.cache {
            cache.set(username, &repos);
        }
        Ok(repos)
    }

    /// Collects the last username again, bypassing the cache.
    pub async fn reload<P: ProgressSink>(&self, sink: P) -> Result<Vec<StarredRepo>> {
        let username = self
            .username()
            .ok_or_else(|| StarsError::InvalidUsername(String::new()))?;
        self.load(&username, true, sink).await
    }

    fn record_progress(&self, cancel: &CancelToken, progress: FetchProgress) {
        let mut state = self.state();
        if !cancel.is_cancelled() {
            state.progress = progress;
        }
    }

    fn commit(&self, cancel: &CancelToken, repos: &[StarredRepo], progress: FetchProgress) -> Result<()> {
        let mut state = self.state();
        if cancel.is_cancelled() {
            debug!("Discarding result of a superseded run");
            return Err(StarsError::Cancelled);
        }
        state.repos = repos.to_vec();
        state.progress = progress;
        Ok(())
    }
}
