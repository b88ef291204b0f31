//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value together with its expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    pub value: V,
    /// Deadline after which the entry reads as absent
    pub expires_at: Instant,
    /// Generation number assigned at insertion, unique per store
    pub stamp: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring at `expires_at`.
    pub fn new(value: V, expires_at: Instant, stamp: u64) -> Self {
        Self {
            value,
            expires_at,
            stamp,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its deadline. Only entries whose deadline
    /// is strictly in the future are live.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiration against a caller-supplied clock reading, so a full
    /// sweep can evaluate every entry against the same instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of the entry.
    ///
    /// Returns `Duration::ZERO` once the deadline has passed.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
