//! # Cachette Core
//!
//! Core cache engine for the Cachette memoization library.
//!
//! This crate provides the building blocks the `#[memoize]` attribute and
//! the [`CachingProxy`] wrapper are assembled from: a bounded LRU store
//! with per-entry TTL expiration, lifetime statistics, cache key
//! generation, and the global registries that make named caches
//! observable and invalidatable from anywhere.
//!
//! ## Features
//!
//! - **LRU Eviction**: Bounded capacity; the least recently read or
//!   written entry makes room for new ones
//! - **Per-Entry TTL**: Every entry expires on its own deadline, checked
//!   lazily with no background thread
//! - **Statistics**: Lock-free hit/miss/eviction/expiration counters with
//!   derived rates
//! - **Eviction Callbacks**: Synchronous notification with the evicted
//!   key and value
//! - **Result-Aware Caching**: `Err` results are returned but never
//!   stored, so transient failures retry
//! - **Testable Time**: The clock is a trait; tests advance time instead
//!   of sleeping
//!
//! ## Module Organization
//!
//! - [`CacheEntry`] - Entry wrapper carrying value, creation time, TTL and
//!   access count
//! - [`LruCache`] - The single-threaded cache engine
//! - [`CachingProxy`] - A memoizing function wrapper sharing one cache
//!   across threads
//! - [`CacheKey`] - Argument-to-key conversion
//! - [`CacheStats`] / [`stats_registry`] - Counters and the by-name
//!   registry over them
//! - [`InvalidationRegistry`] - Clearing named caches from anywhere

mod cache_entry;
mod clock;
mod error;
mod invalidation;
mod keys;
mod lru_cache;
mod proxy;
mod stats;

pub mod stats_registry;

#[cfg(test)]
mod property_tests;

pub use cache_entry::CacheEntry;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
pub use invalidation::InvalidationRegistry;
pub use keys::CacheKey;
pub use lru_cache::{EvictionListener, LruCache};
pub use proxy::CachingProxy;
pub use stats::CacheStats;

/// Cache scope: thread-local or global.
///
/// Determines whether a memoized function's cache lives in thread-local
/// storage or in a global static shared by all threads.
///
/// # Variants
///
/// * `ThreadLocal` - Each thread has its own independent cache
/// * `Global` - One cache shared across all threads behind a mutex
///
/// # Examples
///
/// ```
/// use cachette_core::CacheScope;
///
/// let scope = CacheScope::ThreadLocal;
/// assert_eq!(scope, CacheScope::ThreadLocal);
///
/// let global = CacheScope::Global;
/// assert_eq!(global, CacheScope::Global);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheScope {
    ThreadLocal,
    Global,
}
