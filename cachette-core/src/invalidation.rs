//! Invalidating whole caches by name.
//!
//! Memoized functions own their caches as hidden statics, so callers have
//! no handle to clear them through. Each cache registers a clear callback
//! here under its name instead, and [`InvalidationRegistry::invalidate`]
//! reaches it from anywhere.
//!
//! # Examples
//!
//! ```
//! use cachette_core::InvalidationRegistry;
//!
//! let registry = InvalidationRegistry::global();
//!
//! // A cache registers how it wants to be cleared.
//! registry.register_clear_callback("user_profile", || {
//!     // drop entries...
//! });
//!
//! // Anyone can trigger it by name.
//! assert!(registry.invalidate("user_profile"));
//! assert!(!registry.invalidate("no_such_cache"));
//! ```

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

/// Registry mapping cache names to their clear callbacks.
///
/// The `#[memoize]` attribute registers every generated cache here on
/// first use; [`CachingProxy`](crate::CachingProxy) users typically call
/// [`CachingProxy::clear`](crate::CachingProxy::clear) directly but may
/// register too when clearing-by-name is wanted.
///
/// For thread-scoped caches the callback clears the copy belonging to the
/// thread that triggers the invalidation; other threads keep their
/// entries until they invalidate themselves.
pub struct InvalidationRegistry {
    clear_callbacks: RwLock<HashMap<String, Arc<dyn Fn() + Send + Sync>>>,
}

impl InvalidationRegistry {
    fn new() -> Self {
        Self {
            clear_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static InvalidationRegistry {
        static INSTANCE: std::sync::OnceLock<InvalidationRegistry> = std::sync::OnceLock::new();
        INSTANCE.get_or_init(InvalidationRegistry::new)
    }

    /// Registers the function that clears the cache named `cache_name`.
    ///
    /// Registering the same name again replaces the previous callback.
    pub fn register_clear_callback<F>(&self, cache_name: &str, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.clear_callbacks
            .write()
            .insert(cache_name.to_string(), Arc::new(callback));
    }

    /// Clears the cache registered under `cache_name`.
    ///
    /// Returns `false` when no cache with that name is registered. The
    /// callback runs after the registry lock has been released, so a
    /// callback may itself consult the registry.
    pub fn invalidate(&self, cache_name: &str) -> bool {
        let callback = {
            let callbacks = self.clear_callbacks.read();
            callbacks.get(cache_name).map(Arc::clone)
        };
        match callback {
            Some(callback) => {
                callback();
                debug!(cache = cache_name, "invalidated cache");
                true
            }
            None => false,
        }
    }

    /// Clears every registered cache and returns how many were cleared.
    pub fn invalidate_all(&self) -> usize {
        let callbacks: Vec<_> = {
            let map = self.clear_callbacks.read();
            map.values().map(Arc::clone).collect()
        };
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        debug!(count, "invalidated all registered caches");
        count
    }

    /// Names of all caches currently registered.
    pub fn registered(&self) -> Vec<String> {
        self.clear_callbacks.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    #[serial]
    fn test_invalidate_runs_callback() {
        let cleared = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cleared);

        let registry = InvalidationRegistry::global();
        registry.register_clear_callback("inv_single", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.invalidate("inv_single"));
        assert!(registry.invalidate("inv_single"));
        assert_eq!(cleared.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[serial]
    fn test_invalidate_unknown_name() {
        assert!(!InvalidationRegistry::global().invalidate("inv_never_registered"));
    }

    #[test]
    #[serial]
    fn test_reregistration_replaces_callback() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let registry = InvalidationRegistry::global();
        {
            let counter = Arc::clone(&first);
            registry.register_clear_callback("inv_replaced", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let counter = Arc::clone(&second);
            registry.register_clear_callback("inv_replaced", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(registry.invalidate("inv_replaced"));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_invalidate_all_reaches_every_callback() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        let registry = InvalidationRegistry::global();
        {
            let counter = Arc::clone(&a);
            registry.register_clear_callback("inv_all_a", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let counter = Arc::clone(&b);
            registry.register_clear_callback("inv_all_b", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Other callbacks may still be registered from earlier tests, so
        // only a lower bound on the count is meaningful here.
        let count = registry.invalidate_all();

        assert!(count >= 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_registered_lists_names() {
        let registry = InvalidationRegistry::global();
        registry.register_clear_callback("inv_listed", || {});

        assert!(registry.registered().contains(&"inv_listed".to_string()));
    }
}
