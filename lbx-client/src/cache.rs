//! Time-boxed in-memory cache for fetch results
//!
//! A plain expiring cache, not an LRU: the key space is the lesson, tag and
//! hierarchy surface of one content set, so only staleness matters, never
//! count pressure. Entries older than `max_age` are dropped lazily on access
//! and swept periodically so keys that are never re-requested cannot
//! accumulate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default entry lifetime (5 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Default interval between background sweeps (10 minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

struct CacheEntry<V> {
    data: V,
    stamped: Instant,
}

/// Key/value store with per-entry expiry.
///
/// None of the operations fail; everything is in-memory with no I/O.
pub struct TimeBoxedCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    max_age: Duration,
}

impl<V: Clone + Send + 'static> TimeBoxedCache<V> {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_age,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Value for `key`, if present and younger than `max_age`. A stale entry
    /// is deleted on the way out.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.stamped.elapsed() < self.max_age => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `data` under `key`, overwriting any existing entry and stamping
    /// the current time.
    pub async fn set(&self, key: impl Into<String>, data: V) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.into(),
            CacheEntry {
                data,
                stamped: Instant::now(),
            },
        );
    }

    /// Delete every entry aged `max_age` or older. Returns the number of
    /// evicted entries.
    pub async fn cleanup(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let max_age = self.max_age;
        entries.retain(|_, entry| entry.stamped.elapsed() < max_age);
        before - entries.len()
    }

    /// Drop all entries unconditionally.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Current entry count, stale entries included.
    pub async fn size(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Spawn the periodic sweep task. Runs until the returned handle is
    /// stopped or the process exits.
    pub fn start_sweep(self: &Arc<Self>, interval: Duration) -> SweepHandle {
        let cache = Arc::clone(self);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick of a tokio interval completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let evicted = cache.cleanup().await;
                        if evicted > 0 {
                            debug!(evicted, "cache sweep evicted stale entries");
                        }
                    }
                }
            }
        });
        SweepHandle { token, task }
    }
}

/// Lifecycle handle for the periodic sweep task.
pub struct SweepHandle {
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl SweepHandle {
    /// Ask the sweep task to stop after its current iteration.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stop the sweep task and wait for it to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}
