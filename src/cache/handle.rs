//! Cache Handle Module
//!
//! The public cache type tying together the shared store, the lock, and the
//! background sweeper lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Lookup, StatsSnapshot};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_sweeper;

// == Cache ==
/// Concurrent key-value cache with per-entry TTL expiration.
///
/// A `Cache` owns its store behind an `Arc<RwLock<_>>` shared with a
/// background sweeper task that periodically removes expired entries.
/// Lookups run under the shared side of the lock; every mutation, the sweep
/// included, takes the exclusive side.
///
/// The cache lives until [`Cache::close`] is called or the handle is
/// dropped; both stop the sweeper, so short-lived instances never leak a
/// background task.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memocache::Cache;
///
/// # tokio_test::block_on(async {
/// let cache = Cache::new(Duration::from_secs(300), Duration::from_secs(1)).unwrap();
///
/// cache.set("session:abc", "alice".to_string()).await;
/// assert_eq!(cache.get("session:abc").await.as_deref(), Some("alice"));
///
/// cache.delete("session:abc").await;
/// assert_eq!(cache.get("session:abc").await, None);
///
/// cache.close().await;
/// # });
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    /// Store shared with the sweeper task; the only copy of the data
    store: Arc<RwLock<CacheStore<V>>>,
    /// Sweeper task handle, `None` when sweeping is disabled
    sweeper: Option<JoinHandle<()>>,
    /// Latched by `close`, checked by every operation
    closed: AtomicBool,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache applying `default_ttl` to plain sets, with a sweeper
    /// running every `sweep_interval`.
    ///
    /// A zero `sweep_interval` disables scheduled sweeping entirely; expired
    /// entries are then reclaimed only lazily when a read finds them.
    ///
    /// # Errors
    /// Returns [`CacheError::ZeroDefaultTtl`](crate::error::CacheError) when
    /// `default_ttl` is zero.
    pub fn new(default_ttl: Duration, sweep_interval: Duration) -> Result<Self> {
        Self::with_config(CacheConfig::new(default_ttl, sweep_interval))
    }

    /// Creates a cache from a validated configuration.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(RwLock::new(CacheStore::new(config.default_ttl)));

        let sweeper = if config.sweep_interval > Duration::ZERO {
            Some(spawn_sweeper(Arc::clone(&store), config.sweep_interval))
        } else {
            None
        };

        Ok(Self {
            store,
            sweeper,
            closed: AtomicBool::new(false),
        })
    }

    // == Set ==
    /// Stores a value under `key`, expiring after the default TTL.
    ///
    /// Overwrites any existing entry and resets its TTL. A no-op once the
    /// cache is closed.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        let mut store = self.store.write().await;
        if self.is_closed() {
            return;
        }
        store.insert(key.into(), value);
    }

    /// Stores a value under `key` with a caller-supplied absolute deadline.
    pub async fn set_with_expire(&self, key: impl Into<String>, value: V, expires_at: Instant) {
        let mut store = self.store.write().await;
        if self.is_closed() {
            return;
        }
        store.insert_with_expire(key.into(), value, expires_at);
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` if the key was never set,
    /// was deleted, or has expired.
    ///
    /// A read that finds an expired entry returns `None` immediately and
    /// schedules its removal on a detached task; the removal is conditional
    /// on the entry's stamp, so a concurrent overwrite of the same key is
    /// never deleted by the stale cleanup.
    pub async fn get(&self, key: &str) -> Option<V> {
        if self.is_closed() {
            return None;
        }

        let outcome = self.store.read().await.lookup(key);

        match outcome {
            Lookup::Hit(value) => Some(value),
            Lookup::Absent => None,
            Lookup::Stale { stamp } => {
                let store = Arc::clone(&self.store);
                let key = key.to_owned();
                tokio::spawn(async move {
                    if store.write().await.remove_if_stamp(&key, stamp) {
                        debug!("lazily removed expired entry for key '{}'", key);
                    }
                });
                None
            }
        }
    }

    // == Delete ==
    /// Removes the entry for `key` if present; a no-op otherwise.
    pub async fn delete(&self, key: &str) {
        let mut store = self.store.write().await;
        if self.is_closed() {
            return;
        }
        store.remove(key);
    }

    // == Introspection ==
    /// Returns the remaining lifetime of the live entry for `key`.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        if self.is_closed() {
            return None;
        }
        self.store.read().await.ttl_remaining(key)
    }

    /// Returns the number of resident entries, expired-but-unswept ones
    /// included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> StatsSnapshot {
        self.store.read().await.stats()
    }

    // == Close ==
    /// Shuts the cache down: stops the sweeper and discards every entry.
    ///
    /// Idempotent, and safe to call concurrently with in-flight operations.
    /// Afterwards `get` returns `None` and mutations are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = &self.sweeper {
            handle.abort();
        }

        self.store.write().await.clear();
        info!("cache closed");
    }

    /// Returns true once [`Cache::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        // The sweeper holds a clone of the store Arc and would outlive the
        // handle without this.
        if let Some(handle) = &self.sweeper {
            handle.abort();
        }
    }
}
