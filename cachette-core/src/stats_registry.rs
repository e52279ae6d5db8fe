use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::CacheStats;

/// Global registry of cache statistics, indexed by cache name.
///
/// Every [`CachingProxy`](crate::CachingProxy) and every `#[memoize]`d
/// function registers its counters here, so hit rates can be inspected
/// centrally without holding a reference to each cache instance.
///
/// # Thread Safety
///
/// The registry is thread-safe; registration and queries may run
/// concurrently from any thread.
///
/// # Examples
///
/// ```
/// use cachette_core::stats_registry;
///
/// if let Some(stats) = stats_registry::get("fetch_user") {
///     println!("hit rate: {:.2}%", stats.hit_rate() * 100.0);
/// }
///
/// for name in stats_registry::list() {
///     println!("registered cache: {}", name);
/// }
/// ```
static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers a cache's live counters under `name`.
///
/// Called automatically by [`CachingProxy::new`](crate::CachingProxy::new)
/// and by the `#[memoize]` attribute on first use of the wrapped function.
/// Registering the same name again replaces the previous handle; the last
/// registration wins.
///
/// # Parameters
///
/// * `name` - The name to register under (typically the function name)
/// * `stats` - A shared handle to the cache's counters, as returned by
///   [`LruCache::stats_handle`](crate::LruCache::stats_handle)
pub fn register(name: &str, stats: Arc<CacheStats>) {
    let mut registry = STATS_REGISTRY.write();
    registry.insert(name.to_string(), stats);
}

/// Returns a point-in-time snapshot of the statistics registered under
/// `name`, or `None` when nothing is registered there.
///
/// # Examples
///
/// ```
/// use cachette_core::stats_registry;
///
/// match stats_registry::get("fetch_user") {
///     Some(stats) => println!("{} hits", stats.hits()),
///     None => println!("no such cache"),
/// }
/// ```
pub fn get(name: &str) -> Option<CacheStats> {
    let registry = STATS_REGISTRY.read();
    registry.get(name).map(|stats| stats.as_ref().clone())
}

/// Returns a shared handle to the live counters registered under `name`.
///
/// Unlike [`get`], the handle keeps observing updates, which suits
/// dashboards polling the same counters repeatedly.
pub fn get_handle(name: &str) -> Option<Arc<CacheStats>> {
    let registry = STATS_REGISTRY.read();
    registry.get(name).map(Arc::clone)
}

/// Lists the names of all registered caches.
pub fn list() -> Vec<String> {
    let registry = STATS_REGISTRY.read();
    registry.keys().cloned().collect()
}

/// Resets the counters registered under `name` to zero.
///
/// # Returns
///
/// * `true` - A cache with that name was registered and has been reset
/// * `false` - No cache with that name is registered
pub fn reset(name: &str) -> bool {
    let registry = STATS_REGISTRY.read();
    match registry.get(name) {
        Some(stats) => {
            stats.reset();
            true
        }
        None => false,
    }
}

/// Empties the registry without touching the counters themselves; caches
/// holding their own [`Arc<CacheStats>`] keep counting. Mainly useful in
/// tests.
pub fn clear() {
    let mut registry = STATS_REGISTRY.write();
    registry.clear();
}
