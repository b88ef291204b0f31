//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, StatsSnapshot};

// == Lookup Outcome ==
/// Result of a single key lookup.
///
/// An expired entry is reported as [`Lookup::Stale`] rather than silently
/// removed: removal needs a write lock, and lookups run under a shared read
/// lock. The carried stamp lets the caller remove the entry later without
/// clobbering a value written in the meantime.
#[derive(Debug)]
pub enum Lookup<V> {
    /// The key holds a live entry
    Hit(V),
    /// The key was never set, was deleted, or has already been removed
    Absent,
    /// The key holds an expired entry that has not been removed yet
    Stale {
        /// Generation of the expired entry, for compare-and-delete
        stamp: u64,
    },
}

// == Cache Store ==
/// Key-value storage with per-entry TTL expiration.
///
/// The store itself is single-threaded; concurrent callers share it behind
/// an `Arc<RwLock<CacheStore<V>>>` with reads under the shared side of the
/// lock and all mutation under the exclusive side.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL applied by [`CacheStore::insert`]
    default_ttl: Duration,
    /// Source of per-insert generation numbers
    next_stamp: u64,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new store applying `default_ttl` to plain inserts.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            next_stamp: 0,
        }
    }

    // == Insert ==
    /// Stores a key-value pair expiring after the default TTL.
    ///
    /// If the key already exists, the value is overwritten and the TTL is
    /// reset. Always succeeds.
    pub fn insert(&mut self, key: String, value: V) {
        let expires_at = Instant::now() + self.default_ttl;
        self.insert_with_expire(key, value, expires_at);
    }

    /// Stores a key-value pair with a caller-supplied absolute deadline.
    ///
    /// A deadline at or before the current instant yields an entry that is
    /// born expired and reads as absent from the start.
    pub fn insert_with_expire(&mut self, key: String, value: V, expires_at: Instant) {
        self.next_stamp += 1;
        self.entries
            .insert(key, CacheEntry::new(value, expires_at, self.next_stamp));
    }

    // == Lookup ==
    /// Looks up a key, recording a hit for a live entry and a miss otherwise.
    ///
    /// An expired entry counts as a miss and is reported as [`Lookup::Stale`]
    /// with its stamp; it is never returned to the caller.
    pub fn lookup(&self, key: &str) -> Lookup<V>
    where
        V: Clone,
    {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Lookup::Hit(entry.value.clone())
            }
            Some(entry) => {
                self.stats.record_miss();
                Lookup::Stale { stamp: entry.stamp }
            }
            None => {
                self.stats.record_miss();
                Lookup::Absent
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes an entry only if it still carries `stamp`.
    ///
    /// Used by the lazy expiration path: a read that found an expired entry
    /// schedules its removal, and the stamp check keeps that removal from
    /// deleting a fresher value written for the same key in between.
    pub fn remove_if_stamp(&mut self, key: &str, stamp: u64) -> bool {
        let unchanged = self
            .entries
            .get(key)
            .map_or(false, |entry| entry.stamp == stamp);

        if unchanged {
            self.entries.remove(key);
            self.stats.record_expirations(1);
        }

        unchanged
    }

    // == Purge Expired ==
    /// Removes every expired entry, evaluating all of them against a single
    /// clock reading. Returns the number of entries removed.
    ///
    /// Cost is O(current entry count); no index by deadline is kept.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed as u64);
        self.stats.record_sweep();
        removed
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of a live entry, `None` if the key is
    /// absent or expired.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Clear ==
    /// Discards every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.entries.len())
    }

    // == Length ==
    /// Returns the current number of resident entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TEST_TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(TEST_TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert("key1".to_string(), "value1".to_string());

        assert!(matches!(store.lookup("key1"), Lookup::Hit(v) if v == "value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_nonexistent() {
        let store: CacheStore<String> = CacheStore::new(TEST_TTL);

        assert!(matches!(store.lookup("nonexistent"), Lookup::Absent));
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert("key1".to_string(), "value1".to_string());

        assert!(store.remove("key1"));
        assert!(store.is_empty());
        assert!(matches!(store.lookup("key1"), Lookup::Absent));
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(TEST_TTL);

        assert!(!store.remove("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert("key1".to_string(), "value1".to_string());
        store.insert("key1".to_string(), "value2".to_string());

        assert!(matches!(store.lookup("key1"), Lookup::Hit(v) if v == "value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_expired_entry_reads_stale() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire("key1".to_string(), "value1".to_string(), Instant::now());

        // Born expired, must never be returned
        assert!(matches!(store.lookup("key1"), Lookup::Stale { .. }));
        // Still physically resident until removed
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire(
            "key1".to_string(),
            "value1".to_string(),
            Instant::now() + Duration::from_millis(50),
        );

        assert!(matches!(store.lookup("key1"), Lookup::Hit(_)));

        sleep(Duration::from_millis(100));

        assert!(matches!(store.lookup("key1"), Lookup::Stale { .. }));
    }

    #[test]
    fn test_store_remove_if_stamp_matches() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire("key1".to_string(), "value1".to_string(), Instant::now());

        let stamp = match store.lookup("key1") {
            Lookup::Stale { stamp } => stamp,
            other => panic!("expected stale entry, got {:?}", other),
        };

        assert!(store.remove_if_stamp("key1", stamp));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_remove_if_stamp_spares_fresh_write() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire("key1".to_string(), "old".to_string(), Instant::now());

        let stale_stamp = match store.lookup("key1") {
            Lookup::Stale { stamp } => stamp,
            other => panic!("expected stale entry, got {:?}", other),
        };

        // Key is overwritten before the deferred removal runs
        store.insert("key1".to_string(), "fresh".to_string());

        assert!(!store.remove_if_stamp("key1", stale_stamp));
        assert!(matches!(store.lookup("key1"), Lookup::Hit(v) if v == "fresh"));
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire("dead".to_string(), "value1".to_string(), Instant::now());
        store.insert("live".to_string(), "value2".to_string());

        let removed = store.purge_expired();

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(matches!(store.lookup("live"), Lookup::Hit(_)));
    }

    #[test]
    fn test_store_purge_empty() {
        let mut store: CacheStore<String> = CacheStore::new(TEST_TTL);

        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert("key1".to_string(), "value1".to_string());
        store.insert("key2".to_string(), "value2".to_string());
        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_remaining() {
        let mut store = CacheStore::new(Duration::from_secs(10));

        store.insert("key1".to_string(), "value1".to_string());

        let remaining = store.ttl_remaining("key1").unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));

        assert!(store.ttl_remaining("nonexistent").is_none());
    }

    #[test]
    fn test_store_ttl_remaining_expired() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert_with_expire("key1".to_string(), "value1".to_string(), Instant::now());

        assert!(store.ttl_remaining("key1").is_none());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(TEST_TTL);

        store.insert("key1".to_string(), "value1".to_string());
        let _ = store.lookup("key1"); // hit
        let _ = store.lookup("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }
}
