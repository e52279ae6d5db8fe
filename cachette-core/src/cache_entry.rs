use std::time::{Duration, Instant};

/// One stored value together with the metadata needed to answer
/// "am I stale?" without consulting the cache.
///
/// Each entry records the instant it was created (stamped by the owning
/// cache from its monotonic clock, never supplied by callers), the TTL it
/// was stored with, and how many times it has been read. Overwriting a key
/// replaces the whole entry rather than mutating it, so `created_at` and
/// `access_count` always describe the value currently stored.
///
/// The entry's key is not duplicated here; the map key under which the
/// entry is stored is canonical.
#[derive(Debug, Clone)]
pub struct CacheEntry<R> {
    pub(crate) value: R,
    pub(crate) created_at: Instant,
    pub(crate) ttl: Duration,
    pub(crate) access_count: u64,
}

impl<R> CacheEntry<R> {
    /// Creates an entry stamped with the given clock reading.
    ///
    /// Only the cache constructs entries; taking `now` as a parameter here
    /// keeps the timestamp under the cache clock's control without exposing
    /// a spoofable timestamp to callers.
    pub(crate) fn new(value: R, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            ttl,
            access_count: 0,
        }
    }

    /// Returns a reference to the stored value.
    #[inline]
    pub fn value(&self) -> &R {
        &self.value
    }

    /// Returns the instant this entry was created.
    #[inline]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the TTL this entry was stored with.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns how many times this entry has been successfully read.
    #[inline]
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Returns true when the entry's age strictly exceeds its TTL.
    ///
    /// The comparison is strict: an entry whose age exactly equals its TTL
    /// is still live. A pure read, no side effects.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }

    /// Bumps the read counter, saturating instead of wrapping.
    pub(crate) fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }
}
