//! Basic memoization: recursive Fibonacci with and without the cache.
//!
//! Run with `RUST_LOG=cachette_core=trace` to watch individual hits and
//! misses as they happen.

use std::time::Instant;

use cachette::{memoize, stats_registry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[memoize(capacity = 256)]
fn fibonacci(n: u64) -> u128 {
    if n <= 1 {
        return u128::from(n);
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

fn fibonacci_uncached(n: u64) -> u128 {
    if n <= 1 {
        return u128::from(n);
    }
    fibonacci_uncached(n - 1) + fibonacci_uncached(n - 2)
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachette_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let start = Instant::now();
    let uncached = fibonacci_uncached(32);
    println!("uncached fibonacci(32) = {uncached}  ({:?})", start.elapsed());

    let start = Instant::now();
    let cached = fibonacci(32);
    println!("memoized fibonacci(32) = {cached}  ({:?})", start.elapsed());

    let start = Instant::now();
    fibonacci(32);
    println!("second memoized call       ({:?})", start.elapsed());

    // Larger arguments reuse everything computed so far.
    let start = Instant::now();
    let big = fibonacci(120);
    println!("memoized fibonacci(120) = {big}  ({:?})", start.elapsed());

    let stats = stats_registry::get("fibonacci").expect("registered on first use");
    println!(
        "cache stats: {} hits, {} misses, hit rate {:.1}%",
        stats.hits(),
        stats.misses(),
        stats.hit_rate() * 100.0
    );
}
