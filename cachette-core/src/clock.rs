use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Monotonic time source consulted for entry timestamps and expiration.
///
/// The cache never reads the wall clock: `Instant` is monotonic, so a
/// system clock adjustment can neither prematurely expire entries nor keep
/// stale ones alive. Production code uses [`SystemClock`]; expiration tests
/// use [`ManualClock`] to advance time deterministically instead of
/// sleeping.
pub trait Clock {
    /// Returns the current instant as seen by this clock.
    fn now(&self) -> Instant;
}

/// The default clock, backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning a `ManualClock` yields another handle to the same underlying
/// instant, so a test can keep one handle while the cache owns the other
/// and advance both at once.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cachette_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(20));
/// assert_eq!(clock.now() - start, Duration::from_millis(20));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a manual clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advances the clock by `delta`. All handles observe the change.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
