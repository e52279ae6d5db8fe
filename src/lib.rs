//! # Cachette
//!
//! Function memoization backed by a bounded LRU cache with per-entry TTL
//! expiration.
//!
//! ## Features
//!
//! - **Easy to use**: add `#[memoize]` to any function to cache its results
//! - **Bounded**: a fixed capacity with least-recently-used eviction
//! - **Fresh**: every entry carries a time-to-live and expires lazily
//! - **Observable**: hit, miss, eviction and expiration counters per cache,
//!   discoverable by name through [`stats_registry`]
//! - **Result-aware**: functions returning `Result` cache only `Ok` values
//! - **Scoped**: caches are global by default, or thread-local on request
//!
//! ## Quick Start
//!
//! ```rust
//! use cachette::memoize;
//!
//! #[memoize]
//! fn fibonacci(n: u32) -> u64 {
//!     if n <= 1 {
//!         return n as u64;
//!     }
//!     fibonacci(n - 1) + fibonacci(n - 2)
//! }
//!
//! // First call computes the result
//! let result1 = fibonacci(30);
//! // Second call returns the cached result instantly
//! let result2 = fibonacci(30);
//! assert_eq!(result1, result2);
//! ```
//!
//! ## Capacity and freshness
//!
//! Bound the cache and give entries a lifetime in seconds. When the cache
//! is full the least recently used entry is evicted; entries older than
//! their TTL are dropped on access and recomputed:
//!
//! ```rust
//! use cachette::memoize;
//!
//! #[memoize(capacity = 500, ttl = 2.5)]
//! fn lookup(id: u64) -> String {
//!     format!("row-{id}")
//! }
//! ```
//!
//! ## Named caches and statistics
//!
//! Every memoized function registers its statistics under its cache name
//! (the function name unless overridden with `name = "..."`):
//!
//! ```rust
//! use cachette::{memoize, stats_registry};
//!
//! #[memoize(name = "squares")]
//! fn square(n: u64) -> u64 {
//!     n * n
//! }
//!
//! square(4);
//! square(4);
//!
//! let stats = stats_registry::get("squares").unwrap();
//! assert_eq!(stats.misses(), 1);
//! assert_eq!(stats.hits(), 1);
//! ```
//!
//! ## Fallible functions
//!
//! Functions returning `Result<T, E>` cache only successful results, so
//! errors are retried on the next call:
//!
//! ```rust
//! use cachette::memoize;
//!
//! #[memoize]
//! fn divide(a: i32, b: i32) -> Result<i32, String> {
//!     if b == 0 {
//!         Err("division by zero".to_string())
//!     } else {
//!         Ok(a / b)
//!     }
//! }
//!
//! assert_eq!(divide(10, 2), Ok(5));
//! assert!(divide(10, 0).is_err());
//! ```
//!
//! ## Wrapping a function by hand
//!
//! When an attribute does not fit, [`CachingProxy`] wraps any closure or
//! function pointer with the same cache semantics. The proxy borrows a
//! shared cache rather than owning one, so several proxies can be backed
//! by a single capacity pool:
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use cachette::{CachingProxy, LruCache};
//!
//! let cache = Arc::new(Mutex::new(LruCache::new(100, 60.0).unwrap()));
//! let pricing = CachingProxy::new("pricing", |sku: String| {
//!     sku.len() as u64 * 100
//! }, cache);
//!
//! assert_eq!(pricing.call("ABC-1".to_string()), 500);
//! assert_eq!(pricing.stats().misses(), 1);
//! ```

pub use cachette_core::*;
pub use cachette_macros::memoize;

/// Invalidate a specific cache by its name
///
/// Clears all entries of the cache registered under `cache_name`. For a
/// thread-local cache this clears the copy belonging to the calling
/// thread only.
///
/// # Arguments
///
/// * `cache_name` - The name of the cache to invalidate
///
/// # Returns
///
/// `true` if a cache with that name was registered, `false` otherwise
///
/// # Examples
///
/// ```rust
/// use cachette::{memoize, invalidate_cache};
///
/// #[memoize]
/// fn user_profile(id: u64) -> String {
///     format!("profile-{id}")
/// }
///
/// user_profile(7);
///
/// // Later, when the underlying data changes:
/// assert!(invalidate_cache("user_profile"));
/// ```
pub fn invalidate_cache(cache_name: &str) -> bool {
    InvalidationRegistry::global().invalidate(cache_name)
}

/// Invalidate every registered cache
///
/// Clears all caches that have registered themselves, in no particular
/// order.
///
/// # Returns
///
/// The number of caches that were cleared
///
/// # Examples
///
/// ```rust
/// use cachette::{memoize, invalidate_all_caches};
///
/// #[memoize]
/// fn report(day: u32) -> String {
///     format!("report for day {day}")
/// }
///
/// report(1);
///
/// // After a bulk data reload:
/// assert!(invalidate_all_caches() >= 1);
/// ```
pub fn invalidate_all_caches() -> usize {
    InvalidationRegistry::global().invalidate_all()
}
