//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors a cache can report.
///
/// Runtime operations are total: a missing, deleted, or expired key reads as
/// `None`, never as an error. Only construction can fail, when the supplied
/// configuration is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The configured default TTL was zero
    #[error("default TTL must be greater than zero")]
    ZeroDefaultTtl,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
