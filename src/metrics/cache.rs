// Short-lived cache in front of LogTable::load

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use super::table::LogTable;

/// Default time a loaded table is served before re-reading the file
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

struct CacheEntry {
    loaded_at: Instant,
    table: LogTable,
}

/// Serves the last loaded table for up to `ttl`, then reloads from disk
pub struct CachedLogReader {
    path: PathBuf,
    ttl: Duration,
    cached: Option<CacheEntry>,
}

impl CachedLogReader {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self {
            path,
            ttl,
            cached: None,
        }
    }

    /// Cached table if still fresh, otherwise a full reload
    pub fn read(&mut self) -> Result<&LogTable> {
        let fresh = self
            .cached
            .as_ref()
            .is_some_and(|entry| entry.loaded_at.elapsed() < self.ttl);

        let entry = match self.cached.take() {
            Some(entry) if fresh => entry,
            _ => {
                debug!(path = %self.path.display(), "Reloading monitoring log");
                CacheEntry {
                    loaded_at: Instant::now(),
                    table: LogTable::load(&self.path)?,
                }
            }
        };

        Ok(&self.cached.insert(entry).table)
    }

    /// Drop the cached table so the next read hits the file (manual refresh)
    pub fn clear(&mut self) {
        self.cached = None;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
