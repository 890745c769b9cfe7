//! Durable per-ticker stats cache with time-based expiry.
//!
//! Explicitly owned and passed by reference: the orchestrator or scanner
//! holds the single instance and calls load/flush at run boundaries.
//! Persistence is best-effort — a corrupt or unwritable cache file degrades
//! the cache, never the run.

use crate::domain::market::TickerStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub stats: TickerStats,
}

pub struct StatsCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    path: PathBuf,
    expiry: Duration,
}

impl StatsCache {
    /// Load the cache from `path`. A missing file starts empty; an
    /// unreadable or corrupt one is logged and also starts empty.
    pub fn load(path: PathBuf, expiry_hours: i64) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&content) {
                Ok(map) => {
                    info!("Cache loaded: {} tickers from {:?}", map.len(), path);
                    map
                }
                Err(e) => {
                    warn!("Cache file {:?} is unreadable ({}). Starting empty.", path, e);
                    HashMap::new()
                }
            },
            Err(e) => {
                debug!("No cache at {:?} ({}). Starting empty.", path, e);
                HashMap::new()
            }
        };

        Self {
            entries: RwLock::new(entries),
            path,
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Fresh stats for `ticker`; entries at or past expiry behave as misses.
    pub async fn get(&self, ticker: &str) -> Option<TickerStats> {
        let guard = self.entries.read().await;
        let entry = guard.get(ticker)?;
        if Utc::now() - entry.timestamp < self.expiry {
            Some(entry.stats.clone())
        } else {
            None
        }
    }

    /// Unconditionally overwrite the entry for `ticker`.
    pub async fn put(&self, ticker: &str, stats: TickerStats) {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            stats,
        };
        self.entries.write().await.insert(ticker.to_string(), entry);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Write the cache to disk atomically (temp file + rename).
    ///
    /// Callers log a failure and continue; a flush error is never fatal.
    pub async fn flush(&self) -> Result<()> {
        let snapshot = self.entries.read().await.clone();
        let content =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize cache")?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp cache file")?;
        fs::rename(&temp_path, &self.path).context("Failed to rename cache file")?;

        debug!("Cache flushed: {} tickers to {:?}", snapshot.len(), self.path);
        Ok(())
    }
}
