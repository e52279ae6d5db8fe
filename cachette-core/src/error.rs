use thiserror::Error;

/// Errors reported by cache construction and configuration.
///
/// Runtime outcomes are never errors here: a missing or expired key is an
/// ordinary `None` from [`LruCache::get`](crate::LruCache::get). The only
/// failures are configuration mistakes, rejected at the boundary where
/// they are made.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheError {
    /// A cache cannot hold fewer than one entry.
    #[error("cache capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// TTLs are seconds expressed as a non-negative, finite float.
    #[error("ttl must be a non-negative, finite number of seconds, got {0}")]
    InvalidTtl(f64),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
