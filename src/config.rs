//! Configuration Module
//!
//! The two durations governing a cache instance, with environment-variable
//! loading and validation.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Values can also be loaded from environment variables with sensible
/// defaults, which suits host applications that configure their caches from
/// the process environment.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied to entries stored without an explicit deadline
    pub default_ttl: Duration,
    /// Period between sweeper passes; zero disables scheduled sweeping
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a configuration from the two durations.
    pub fn new(default_ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            default_ttl,
            sweep_interval,
        }
    }

    /// Creates a CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Rejects configurations the cache cannot meaningfully run with.
    ///
    /// A zero default TTL would make every plain set produce an entry that
    /// is expired on arrival. A zero sweep interval is valid and disables
    /// scheduled sweeping.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl.is_zero() {
            return Err(CacheError::ZeroDefaultTtl);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(1),
        }
    }
}
