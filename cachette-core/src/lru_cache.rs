use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache_entry::CacheEntry;
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::stats::CacheStats;

/// Callback invoked with the key and value of an entry leaving the cache.
///
/// Fired synchronously on capacity eviction and on explicit invalidation,
/// after the entry has already been removed from the store. Not fired for
/// TTL expiry or [`LruCache::clear`].
pub type EvictionListener<R> = Arc<dyn Fn(&str, &R) + Send + Sync>;

/// A bounded key-value store with least-recently-used eviction and lazy
/// per-entry TTL expiration.
///
/// The cache keeps at most `capacity` entries. Inserting a new key at
/// capacity first evicts exactly one entry, the one read or written longest
/// ago. Every entry carries its own TTL (the cache default unless a `put`
/// overrides it); staleness is checked lazily when the entry is next
/// touched, never by a background thread, so expired entries may linger
/// until the next access but memory stays bounded by `capacity` regardless.
///
/// Lookups report absence through the return value: `get` yields
/// `Some(value)` or `None`, never an error. Since the value type is a type
/// parameter, `None` can never collide with a legitimately cached payload
/// (caching an `Option<T>` yields `Some(None)` on a hit, distinct from the
/// `None` miss).
///
/// # Concurrency
///
/// The cache is single-threaded: every mutating operation takes
/// `&mut self` and runs to completion. For cross-thread sharing, wrap the
/// whole cache in a mutex (`Arc<parking_lot::Mutex<LruCache<R>>>`);
/// [`CachingProxy`](crate::CachingProxy) and the `#[memoize]` attribute do
/// exactly that. Recency ordering is exact and deterministic within a
/// thread of execution.
///
/// # Ownership of stored values
///
/// `get` hands out clones. The cache does not defend against caller-side
/// mutation of values that share interior state (an `Arc<Mutex<_>>` payload,
/// say); add copy-on-read at the call site if that matters.
///
/// # Examples
///
/// ```
/// use cachette_core::LruCache;
///
/// let mut cache = LruCache::new(2, 300.0).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// assert_eq!(cache.get("a"), Some(1));
///
/// // "a" was just read, so inserting a third key evicts "b".
/// cache.put("c", 3);
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.get("a"), Some(1));
/// assert_eq!(cache.get("c"), Some(3));
/// ```
pub struct LruCache<R, C = SystemClock> {
    map: HashMap<String, CacheEntry<R>>,
    // Front is the least recently used key, back the most recent. Holds
    // exactly the same key set as `map` at all times.
    order: VecDeque<String>,
    capacity: usize,
    default_ttl: Duration,
    stats: Arc<CacheStats>,
    on_evict: Option<EvictionListener<R>>,
    clock: C,
}

impl<R: Clone> LruCache<R, SystemClock> {
    /// Creates a cache holding at most `capacity` entries, expiring them
    /// `default_ttl_seconds` after insertion unless a `put` overrides it.
    ///
    /// # Errors
    ///
    /// * [`CacheError::InvalidCapacity`] when `capacity` is zero; there is
    ///   no degraded mode for a cache that can hold nothing.
    /// * [`CacheError::InvalidTtl`] when the TTL is negative, NaN, or
    ///   infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachette_core::{CacheError, LruCache};
    ///
    /// let cache: LruCache<String> = LruCache::new(100, 60.0).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    ///
    /// let err = LruCache::<String>::new(0, 60.0).unwrap_err();
    /// assert_eq!(err, CacheError::InvalidCapacity(0));
    /// ```
    pub fn new(capacity: usize, default_ttl_seconds: f64) -> Result<Self> {
        Self::with_clock(capacity, default_ttl_seconds, SystemClock)
    }
}

impl<R: Clone, C: Clock> LruCache<R, C> {
    /// Creates a cache driven by the given clock.
    ///
    /// Production code uses [`new`](LruCache::new); expiration tests pass a
    /// [`ManualClock`](crate::ManualClock) and advance time explicitly
    /// instead of sleeping.
    pub fn with_clock(capacity: usize, default_ttl_seconds: f64, clock: C) -> Result<Self> {
        if capacity < 1 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        let default_ttl = ttl_from_secs(default_ttl_seconds)?;
        Ok(Self {
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            default_ttl,
            stats: Arc::new(CacheStats::new()),
            on_evict: None,
            clock,
        })
    }

    /// Registers a listener invoked with the key and value of every entry
    /// removed by capacity eviction or [`invalidate`](LruCache::invalidate).
    ///
    /// The listener runs synchronously, after the entry has left the store
    /// and before the triggering operation returns. A panic inside the
    /// listener propagates to the caller of `put` or `invalidate`; the
    /// cache's own state is consistent either way, because the removal has
    /// already happened.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use parking_lot::Mutex;
    /// use cachette_core::LruCache;
    ///
    /// let evicted = Arc::new(Mutex::new(Vec::new()));
    /// let log = Arc::clone(&evicted);
    ///
    /// let mut cache = LruCache::new(1, 60.0)
    ///     .unwrap()
    ///     .with_eviction_listener(move |key, value: &i32| {
    ///         log.lock().push((key.to_string(), *value));
    ///     });
    ///
    /// cache.put("a", 1);
    /// cache.put("b", 2); // evicts "a"
    /// assert_eq!(evicted.lock().as_slice(), &[("a".to_string(), 1)]);
    /// ```
    pub fn with_eviction_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str, &R) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(listener));
        self
    }

    /// Retrieves the value stored under `key`, refreshing its recency.
    ///
    /// # Behavior
    ///
    /// * Key absent: records a miss, returns `None`.
    /// * Key present but past its TTL: removes the entry, records one
    ///   expiration **and** one miss (expiry is a cause of miss), returns
    ///   `None`. The eviction listener does not fire.
    /// * Key present and live: moves it to the most-recently-used position,
    ///   bumps its access counter, records a hit, returns a clone.
    ///
    /// A miss never reorders surviving entries.
    pub fn get(&mut self, key: &str) -> Option<R> {
        let now = self.clock.now();

        let expired = match self.map.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                trace!(key, "cache miss");
                return None;
            }
        };

        if expired {
            self.drop_expired(key);
            self.stats.record_miss();
            return None;
        }

        // Live hit: bump the read counter, clone the value out, refresh
        // recency last so the borrow of `map` has ended.
        let entry = self.map.get_mut(key)?;
        entry.record_access();
        let value = entry.value().clone();
        move_key_to_back(&mut self.order, key);
        self.stats.record_hit();
        trace!(key, "cache hit");
        Some(value)
    }

    /// Stores `value` under `key` with the cache's default TTL.
    ///
    /// Overwriting an existing key replaces its entry outright (fresh
    /// creation time, access counter back to zero) and moves it to the
    /// most-recently-used position without evicting anything. Inserting a
    /// new key when the cache is full first evicts the least recently used
    /// entry (firing the eviction listener and counting one eviction), so
    /// the entry count never exceeds `capacity`.
    pub fn put(&mut self, key: impl Into<String>, value: R) {
        let ttl = self.default_ttl;
        self.insert_entry(key.into(), value, ttl);
    }

    /// Stores `value` under `key` with a TTL overriding the cache default.
    ///
    /// Same insertion semantics as [`put`](LruCache::put).
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidTtl`] when `ttl_seconds` is negative, NaN, or
    /// infinite; the store is left untouched.
    pub fn put_with_ttl(
        &mut self,
        key: impl Into<String>,
        value: R,
        ttl_seconds: f64,
    ) -> Result<()> {
        let ttl = ttl_from_secs(ttl_seconds)?;
        self.insert_entry(key.into(), value, ttl);
        Ok(())
    }

    pub(crate) fn insert_entry(&mut self, key: String, value: R, ttl: Duration) {
        let now = self.clock.now();

        if self.map.contains_key(&key) {
            // Replace, never mutate: the old entry's timestamp and access
            // counter must not leak into the new value's lifetime.
            self.map.insert(key.clone(), CacheEntry::new(value, ttl, now));
            move_key_to_back(&mut self.order, &key);
            trace!(key = %key, "overwrote entry");
            return;
        }

        if self.map.len() == self.capacity {
            self.evict_lru();
        }

        self.map.insert(key.clone(), CacheEntry::new(value, ttl, now));
        self.order.push_back(key);
    }

    /// Removes the entry under `key`, reporting whether it was present.
    ///
    /// Presence is physical: an expired entry that has not been pruned yet
    /// still counts (and is removed). The eviction listener fires with the
    /// removed key and value, but the eviction counter does not move:
    /// explicit invalidation is not capacity pressure. Absent keys are a
    /// no-op returning `false`, not an error.
    pub fn invalidate(&mut self, key: &str) -> bool {
        match self.map.remove(key) {
            Some(entry) => {
                remove_key(&mut self.order, key);
                debug!(key, "invalidated entry");
                if let Some(listener) = &self.on_evict {
                    listener(key, entry.value());
                }
                true
            }
            None => false,
        }
    }

    /// Removes every entry. Statistics are deliberately left alone: the
    /// counters are a lifetime record, not a per-generation one. Call
    /// [`CacheStats::reset`] through [`stats_handle`](LruCache::stats_handle)
    /// for a fresh measurement window. The eviction listener does not fire.
    pub fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.order.clear();
        debug!(dropped, "cleared cache");
    }

    /// Returns the live keys in least-to-most-recently-used order.
    ///
    /// As a documented side effect, every expired entry found during the
    /// scan is pruned, incrementing the expiration counter once per entry
    /// (no miss is recorded; nothing looked those keys up). This is the
    /// natural point to reclaim stale entries without a background thread.
    pub fn keys(&mut self) -> Vec<String> {
        let now = self.clock.now();
        let mut live = Vec::with_capacity(self.order.len());

        let map = &mut self.map;
        let stats = &self.stats;
        self.order.retain(|key| {
            let expired = map.get(key).map_or(false, |entry| entry.is_expired(now));
            if expired {
                map.remove(key);
                stats.record_expiration();
                debug!(key = %key, "pruned expired entry");
                false
            } else {
                live.push(key.clone());
                true
            }
        });

        live
    }

    /// Looks at the entry stored under `key` without touching recency,
    /// counters, or expiry state.
    ///
    /// Returns whatever is physically stored, stale or live; `None` only
    /// when the key is genuinely absent. Meant for diagnostics and tests,
    /// not as a lookup path.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<R>> {
        self.map.get(key)
    }

    /// Number of physically stored entries, including expired ones that
    /// have not been pruned yet. Never exceeds `capacity`.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries this cache will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// TTL applied when [`put`](LruCache::put) does not override it.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns a point-in-time snapshot of the statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.as_ref().clone()
    }

    /// Returns a shared handle to the live counters, suitable for the
    /// stats registry or for reading stats while something else holds the
    /// cache.
    pub fn stats_handle(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    fn drop_expired(&mut self, key: &str) {
        self.map.remove(key);
        remove_key(&mut self.order, key);
        self.stats.record_expiration();
        debug!(key, "dropped expired entry on access");
    }

    // Exactly one entry leaves per call; the caller has already established
    // that the cache is full and the incoming key is new.
    fn evict_lru(&mut self) {
        if let Some(lru_key) = self.order.pop_front() {
            if let Some(entry) = self.map.remove(&lru_key) {
                self.stats.record_eviction();
                debug!(key = %lru_key, "evicted least recently used entry");
                if let Some(listener) = &self.on_evict {
                    listener(&lru_key, entry.value());
                }
            }
        }
    }
}

/// Caching for fallible computations: only successes are worth keeping.
///
/// Errors are typically transient, so a stored `Err` would keep failing
/// callers long after the cause has passed. [`put_result`](LruCache::put_result)
/// therefore stores `Ok` values and silently skips `Err`; the `#[memoize]`
/// attribute routes functions returning `Result` through it.
impl<T: Clone, E: Clone, C: Clock> LruCache<std::result::Result<T, E>, C> {
    /// Stores `result` under `key` only when it is `Ok`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachette_core::LruCache;
    ///
    /// let mut cache: LruCache<Result<i32, String>> = LruCache::new(10, 60.0).unwrap();
    ///
    /// cache.put_result("good", &Ok(42));
    /// cache.put_result("bad", &Err("boom".to_string()));
    ///
    /// assert_eq!(cache.get("good"), Some(Ok(42)));
    /// assert_eq!(cache.get("bad"), None);
    /// ```
    pub fn put_result(&mut self, key: impl Into<String>, result: &std::result::Result<T, E>) {
        if let Ok(value) = result {
            self.put(key, Ok(value.clone()));
        }
    }
}

impl<R, C> fmt::Debug for LruCache<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

pub(crate) fn ttl_from_secs(secs: f64) -> Result<Duration> {
    // Rejects negative, NaN, infinite and absurdly large values in one go.
    Duration::try_from_secs_f64(secs).map_err(|_| CacheError::InvalidTtl(secs))
}

/// Moves `key` to the back of the recency queue (most recently used slot).
/// No-op when the key is not queued.
fn move_key_to_back(order: &mut VecDeque<String>, key: &str) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(owned) = order.remove(pos) {
            order.push_back(owned);
        }
    }
}

/// Drops `key` from the recency queue wherever it sits.
fn remove_key(order: &mut VecDeque<String>, key: &str) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
    }
}
