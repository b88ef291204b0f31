//! Memocache - A lightweight in-process key-value cache
//!
//! Provides a concurrent, generic key-value store with per-entry TTL
//! expiration and a background sweeper that reclaims expired entries without
//! caller polling. Intended as a building block for short-lived memoization
//! such as request-scoped or session-scoped data; purely local-memory and
//! non-durable.
//!
//! # Quick Start
//! ```
//! use std::time::{Duration, Instant};
//! use memocache::Cache;
//!
//! # tokio_test::block_on(async {
//! // Entries default to a 60 second TTL; the sweeper runs every second.
//! let cache = Cache::new(Duration::from_secs(60), Duration::from_secs(1)).unwrap();
//!
//! cache.set("user:123", "Alice".to_string()).await;
//! assert_eq!(cache.get("user:123").await.as_deref(), Some("Alice"));
//!
//! // Per-entry deadlines override the default TTL.
//! cache
//!     .set_with_expire(
//!         "token:xyz",
//!         "secret".to_string(),
//!         Instant::now() + Duration::from_secs(5),
//!     )
//!     .await;
//!
//! // Teardown stops the sweeper and discards all entries.
//! cache.close().await;
//! # });
//! ```
//!
//! Values are opaque to the cache. A single instance stores one value type
//! `V`; callers that need heterogeneous values in one cache pick an enum or
//! boxed type for `V`.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheEntry, CacheStats, CacheStore, Lookup, StatsSnapshot};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
