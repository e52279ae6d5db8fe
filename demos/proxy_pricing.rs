//! Wrapping an expensive lookup in a [`CachingProxy`] by hand.
//!
//! The proxy is useful when the cached function is built at runtime, for
//! example around a connection handle, where an attribute cannot reach.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cachette::{CachingProxy, LruCache};
use parking_lot::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stands in for a slow pricing service round trip.
fn quote_price(sku: &str) -> u64 {
    thread::sleep(Duration::from_millis(120));
    sku.bytes().map(u64::from).sum::<u64>() * 7 % 10_000
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachette_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cache = Arc::new(Mutex::new(
        LruCache::new(100, 300.0).expect("valid capacity and ttl"),
    ));
    let pricing = CachingProxy::new("pricing", |sku: String| quote_price(&sku), cache)
        .ttl(30.0)
        .expect("valid ttl override");

    for sku in ["WIDGET-1", "WIDGET-2", "WIDGET-1", "WIDGET-1", "WIDGET-2"] {
        let start = Instant::now();
        let price = pricing.call(sku.to_string());
        println!("{sku}: {price} cents  ({:?})", start.elapsed());
    }

    println!(
        "proxy stats: {} hits, {} misses",
        pricing.stats().hits(),
        pricing.stats().misses()
    );

    // Drop one SKU and watch the next call pay the full cost again.
    pricing.invalidate(&"WIDGET-1".to_string());
    let start = Instant::now();
    pricing.call("WIDGET-1".to_string());
    println!("after invalidate: WIDGET-1 recomputed in {:?}", start.elapsed());
}
