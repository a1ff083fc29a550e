//! Process-local TTL cache of tenant records.
//!
//! Keys are whatever identifier the request used (id or slug). Reads re-check expiry, so
//! an expired entry is absent even before the sweeper removes it; the sweeper only
//! bounds memory.
//!
//! Writes are last-writer-wins: records are snapshots of the registry, and two requests
//! missing on the same key may both fetch and store.
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::repos::TenantRecord;

#[derive(Debug, Clone)]
pub struct CachedTenantEntry {
    pub record: TenantRecord,
    pub cached_at: DateTime<Utc>,
    pub expires_at: Instant,
}

impl CachedTenantEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
pub struct TenantDirectory {
    entries: RwLock<HashMap<String, CachedTenantEntry>>,
    ttl: Duration,
}

impl TenantDirectory {
    /// A directory without a sweeper. Expired entries stay until overwritten or deleted.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// A directory with its background sweeper. The sweeper stops when `shutdown` is
    /// cancelled or the directory is dropped.
    ///
    /// Outside a tokio runtime the sweeper cannot be spawned; the directory still works.
    pub fn spawn(ttl: Duration, sweep_interval: Duration, shutdown: CancellationToken) -> Arc<Self> {
        let directory = Arc::new(Self::new(ttl));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(sweep_loop(
                    Arc::downgrade(&directory),
                    sweep_interval,
                    shutdown,
                ));
            }
            Err(_) => {
                tracing::warn!("no tokio runtime; tenant directory sweeper not started");
            }
        }

        directory
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached record for `key`, if present and not expired. Never consults the registry.
    pub async fn get(&self, key: &str) -> Option<TenantRecord> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.record.clone())
    }

    pub async fn set(&self, key: &str, record: TenantRecord) {
        let entry = CachedTenantEntry {
            record,
            cached_at: Utc::now(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Returns whether an entry (fresh or not) was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Physical entry count, expired-but-unswept entries included.
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Remove every expired entry; returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }
}

async fn sweep_loop(
    directory: Weak<TenantDirectory>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let Some(directory) = directory.upgrade() else {
                    break;
                };
                let removed = directory.sweep_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "swept expired tenant directory entries");
                }
            }
        }
    }

    tracing::debug!("tenant directory sweeper stopped");
}
