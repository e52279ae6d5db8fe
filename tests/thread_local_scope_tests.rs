use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use cachette::memoize;

static TL_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoize(scope = "thread_local")]
fn per_thread_square(n: u64) -> u64 {
    TL_CALLS.fetch_add(1, Ordering::SeqCst);
    n * n
}

#[test]
fn test_same_thread_reuses_its_cache() {
    assert_eq!(per_thread_square(9), 81);
    assert_eq!(per_thread_square(9), 81);
    assert_eq!(TL_CALLS.load(Ordering::SeqCst), 1);

    // A different thread gets an independent cache and computes again.
    let handle = thread::spawn(|| per_thread_square(9));
    assert_eq!(handle.join().unwrap(), 81);
    assert_eq!(TL_CALLS.load(Ordering::SeqCst), 2);
}

#[memoize(scope = "thread_local", capacity = 4, ttl = 60.0)]
fn per_thread_tag(n: u32) -> String {
    format!("thread-{n}-{:?}", thread::current().id())
}

#[test]
fn test_threads_never_observe_each_other_entries() {
    let mine = per_thread_tag(1);

    let handle = thread::spawn(|| per_thread_tag(1));
    let theirs = handle.join().unwrap();

    // Same argument, but each thread computed with its own thread id.
    assert_ne!(mine, theirs);
    // And the calling thread still hits its own cached value.
    assert_eq!(per_thread_tag(1), mine);
}

static SHARED_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoize(scope = "global")]
fn shared_square(n: u64) -> u64 {
    SHARED_CALLS.fetch_add(1, Ordering::SeqCst);
    n * n
}

#[test]
fn test_global_scope_is_shared_between_threads() {
    // Populate the cache before spawning so every thread hits.
    assert_eq!(shared_square(7), 49);

    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| shared_square(7)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 49);
    }

    assert_eq!(SHARED_CALLS.load(Ordering::SeqCst), 1);
}
