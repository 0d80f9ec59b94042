//! Short-lived snapshots of finished collection runs, keyed by username.
//!
//! Keys are case-insensitive. Entries older than the configured TTL read as
//! absent and are removed on that read. Storage failures never reach the
//! caller: a cache that cannot be written behaves like an empty cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::StarredRepo;

pub const DEFAULT_TTL_MINUTES: i64 = 30;
/// One year
pub const MAX_TTL_MINUTES: i64 = 525_600;
const CACHE_KEY_PREFIX: &str = "astrolabe-stars-";

pub trait StarCache: Send + Sync {
    fn get(&self, username: &str) -> Option<Vec<StarredRepo>>;
    fn set(&self, username: &str, repos: &[StarredRepo]);
    fn clear(&self, username: &str);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Vec<StarredRepo>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.timestamp > ttl
    }
}

/// TTL of `minutes`, or `None` outside `0..=MAX_TTL_MINUTES`.
pub fn ttl_from_minutes(minutes: i64) -> Option<Duration> {
    if !(0..=MAX_TTL_MINUTES).contains(&minutes) {
        return None;
    }
    Duration::try_minutes(minutes)
}

fn cache_key(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Session-scoped cache held in memory.
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_at(&self, username: &str, now: DateTime<Utc>) -> Option<Vec<StarredRepo>> {
        let key = cache_key(username);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(&key)?.is_expired(self.ttl, now) {
            debug!(username = %key, "Cache entry expired");
            entries.remove(&key);
            return None;
        }
        entries.get(&key).map(|entry| entry.data.clone())
    }

    pub fn set_at(&self, username: &str, repos: &[StarredRepo], now: DateTime<Utc>) {
        let entry = CacheEntry {
            data: repos.to_vec(),
            timestamp: now,
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(cache_key(username), entry);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_TTL_MINUTES))
    }
}

impl StarCache for MemoryCache {
    fn get(&self, username: &str) -> Option<Vec<StarredRepo>> {
        self.get_at(username, Utc::now())
    }

    fn set(&self, username: &str, repos: &[StarredRepo]) {
        self.set_at(username, repos, Utc::now())
    }

    fn clear(&self, username: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&cache_key(username));
    }
}

/// Persistent cache: one JSON file per username under `dir`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// `<platform cache dir>/astrolabe`, if the platform has one
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("astrolabe"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, username: &str) -> PathBuf {
        // GitHub logins are alphanumeric plus '-'; anything else is neutralised
        let safe: String = cache_key(username)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}{}.json", CACHE_KEY_PREFIX, safe))
    }

    pub fn get_at(&self, username: &str, now: DateTime<Utc>) -> Option<Vec<StarredRepo>> {
        let path = self.path_for(username);
        let raw = fs::read_to_string(&path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), "Ignoring unreadable cache entry: {}", e);
                return None;
            }
        };

        if entry.is_expired(self.ttl, now) {
            debug!(path = %path.display(), "Cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }

        Some(entry.data)
    }

    pub fn set_at(&self, username: &str, repos: &[StarredRepo], now: DateTime<Utc>) {
        let path = self.path_for(username);
        let entry = CacheEntry {
            data: repos.to_vec(),
            timestamp: now,
        };

        let result = fs::create_dir_all(&self.dir)
            .map_err(crate::error::StarsError::from)
            .and_then(|_| Ok(serde_json::to_vec(&entry)?))
            .and_then(|bytes| Ok(fs::write(&path, bytes)?));

        if let Err(e) = result {
            warn!(path = %path.display(), "Failed to write cache entry: {}", e);
        }
    }
}

impl StarCache for FileCache {
    fn get(&self, username: &str) -> Option<Vec<StarredRepo>> {
        self.get_at(username, Utc::now())
    }

    fn set(&self, username: &str, repos: &[StarredRepo]) {
        self.set_at(username, repos, Utc::now())
    }

    fn clear(&self, username: &str) {
        let path = self.path_for(username);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), "Failed to clear cache entry: {}", e);
            }
        }
    }
}
