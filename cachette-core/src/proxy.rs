use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::keys::CacheKey;
use crate::lru_cache::{ttl_from_secs, LruCache};
use crate::stats::CacheStats;
use crate::stats_registry;

/// A memoizing wrapper around a function.
///
/// `call` behaves exactly like the wrapped function from the caller's point
/// of view, except that results are remembered: the first call with a given
/// argument computes, later calls within the TTL return the cached clone.
///
/// The proxy does not own its cache. It holds a shared handle, so several
/// proxies may be backed by one `LruCache` and compete for its capacity.
/// Entries are keyed by the proxy's name joined with the [`CacheKey`]
/// rendering of the arguments, which keeps equal arguments of different
/// proxies apart. Functions of more than one argument are wrapped as a
/// single tuple argument; the tuple's key rendering keeps the positions
/// apart.
///
/// # Concurrency
///
/// The proxy is shareable across threads (it is `Sync` when the wrapped
/// function is). The cache lock is held only for the lookup and the store,
/// never while the wrapped function runs, so a slow computation does not
/// serialize unrelated callers. The flip side: two threads that miss on
/// the same key concurrently both compute, and the later store wins. There
/// is no request coalescing.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use cachette_core::{CachingProxy, LruCache};
///
/// let cache = Arc::new(Mutex::new(LruCache::new(100, 60.0).unwrap()));
/// let square = CachingProxy::new("square", |n: u64| n * n, cache);
///
/// assert_eq!(square.call(4), 16);
/// assert_eq!(square.call(4), 16); // served from cache
///
/// let stats = square.stats();
/// assert_eq!(stats.hits(), 1);
/// assert_eq!(stats.misses(), 1);
/// ```
///
/// Two proxies sharing one cache:
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use cachette_core::{CachingProxy, LruCache};
///
/// let shared = Arc::new(Mutex::new(LruCache::new(50, 60.0).unwrap()));
/// let double = CachingProxy::new("double", |n: u64| n * 2, Arc::clone(&shared));
/// let triple = CachingProxy::new("triple", |n: u64| n * 3, Arc::clone(&shared));
///
/// // Equal arguments, distinct entries: the name is part of the key.
/// assert_eq!(double.call(5), 10);
/// assert_eq!(triple.call(5), 15);
/// assert_eq!(shared.lock().len(), 2);
/// ```
pub struct CachingProxy<A, R, F> {
    name: String,
    func: F,
    cache: Arc<Mutex<LruCache<R>>>,
    ttl_override: Option<Duration>,
    _args: PhantomData<fn(A)>,
}

impl<A, R, F> CachingProxy<A, R, F>
where
    A: CacheKey,
    R: Clone,
    F: Fn(A) -> R,
{
    /// Wraps `func`, storing its results in `cache` under keys prefixed
    /// with `name`.
    ///
    /// The cache's counters are registered in the global
    /// [`stats_registry`] under `name`; proxies sharing a cache share its
    /// counters.
    pub fn new(name: impl Into<String>, func: F, cache: Arc<Mutex<LruCache<R>>>) -> Self {
        let name = name.into();
        stats_registry::register(&name, cache.lock().stats_handle());
        Self {
            name,
            func,
            cache,
            ttl_override: None,
            _args: PhantomData,
        }
    }

    /// Gives this proxy's entries their own lifetime instead of the
    /// cache's default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidTtl`](crate::CacheError::InvalidTtl)
    /// when `ttl_seconds` is negative, NaN, or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use parking_lot::Mutex;
    /// use cachette_core::{CachingProxy, LruCache};
    ///
    /// let cache = Arc::new(Mutex::new(LruCache::new(10, 3600.0).unwrap()));
    /// let quotes = CachingProxy::new("quotes", |sym: String| sym.len(), cache)
    ///     .ttl(2.5)
    ///     .unwrap();
    /// ```
    pub fn ttl(mut self, ttl_seconds: f64) -> Result<Self> {
        self.ttl_override = Some(ttl_from_secs(ttl_seconds)?);
        Ok(self)
    }

    /// Invokes the wrapped function through the cache.
    ///
    /// On a hit the stored clone is returned and the function does not
    /// run. On a miss (including expiry) the function runs outside the
    /// lock and its result is stored before being returned.
    pub fn call(&self, args: A) -> R {
        let key = self.render_key(&args);

        if let Some(value) = self.cache.lock().get(&key) {
            trace!(cache = %self.name, key = %key, "proxy served from cache");
            return value;
        }

        let value = (self.func)(args);
        self.store(key, value.clone());
        value
    }

    /// Removes the cached result for `args`, reporting whether one was
    /// stored. The next `call` with these arguments recomputes.
    pub fn invalidate(&self, args: &A) -> bool {
        self.cache.lock().invalidate(&self.render_key(args))
    }

    /// Drops every entry of the backing cache, including entries of other
    /// proxies sharing it. Counters keep their lifetime totals.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Live keys of the backing cache, least recently used first. Prunes
    /// expired entries like [`LruCache::keys`].
    pub fn keys(&self) -> Vec<String> {
        self.cache.lock().keys()
    }

    /// Number of results in the backing cache, including not-yet-pruned
    /// expired ones.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true when the backing cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Point-in-time snapshot of the backing cache's counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// The name this proxy prefixes its keys with and is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn render_key(&self, args: &A) -> String {
        format!("{}|{}", self.name, args.cache_key())
    }

    fn store(&self, key: String, value: R) {
        let mut cache = self.cache.lock();
        let ttl = self.ttl_override.unwrap_or_else(|| cache.default_ttl());
        cache.insert_entry(key, value, ttl);
    }
}

impl<A, T, E, F> CachingProxy<A, std::result::Result<T, E>, F>
where
    A: CacheKey,
    T: Clone,
    E: Clone,
    F: Fn(A) -> std::result::Result<T, E>,
{
    /// Invokes a fallible wrapped function through the cache.
    ///
    /// Only `Ok` results are stored; an `Err` is returned to the caller
    /// and the next call with the same arguments retries the computation.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// use parking_lot::Mutex;
    /// use cachette_core::{CachingProxy, LruCache};
    ///
    /// static CALLS: AtomicUsize = AtomicUsize::new(0);
    ///
    /// let cache = Arc::new(Mutex::new(LruCache::new(10, 60.0).unwrap()));
    /// let parse = CachingProxy::new("parse", |s: &str| {
    ///     CALLS.fetch_add(1, Ordering::SeqCst);
    ///     s.parse::<i32>().map_err(|e| e.to_string())
    /// }, cache);
    ///
    /// assert_eq!(parse.try_call("7"), Ok(7));
    /// assert_eq!(parse.try_call("7"), Ok(7));
    /// assert!(parse.try_call("x").is_err());
    /// assert!(parse.try_call("x").is_err());
    ///
    /// // "7" computed once, "x" retried every time.
    /// assert_eq!(CALLS.load(Ordering::SeqCst), 3);
    /// ```
    pub fn try_call(&self, args: A) -> std::result::Result<T, E> {
        let key = self.render_key(&args);

        if let Some(cached) = self.cache.lock().get(&key) {
            trace!(cache = %self.name, key = %key, "proxy served from cache");
            return cached;
        }

        let result = (self.func)(args);
        if let Ok(value) = &result {
            self.store(key, Ok(value.clone()));
        }
        result
    }
}

impl<A, R, F> fmt::Debug for CachingProxy<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingProxy")
            .field("name", &self.name)
            .field("ttl_override", &self.ttl_override)
            .finish_non_exhaustive()
    }
}
