//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// passes. Each pass acquires the exclusive side of the store lock and
/// removes every entry whose deadline has been reached, so readers are
/// bounded in how many stale entries they can encounter.
///
/// The returned `JoinHandle` is owned by the cache handle, which aborts it
/// on close or drop.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(Duration::from_secs(300))));
/// let sweeper = spawn_sweeper(store.clone(), Duration::from_secs(1));
/// // Later, during teardown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("starting TTL sweeper with interval of {:?}", interval);

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire the write lock and purge expired entries
            let (removed, remaining) = {
                let mut store = store.write().await;
                let removed = store.purge_expired();
                (removed, store.len())
            };

            if removed > 0 {
                info!(
                    "sweep removed {} expired entries, {} remaining",
                    removed, remaining
                );
            } else {
                debug!("sweep found no expired entries");
            }
        }
    })
}
