//! Observing capacity evictions through an eviction listener, then
//! watching TTL expiry prune the survivors.

use std::thread;
use std::time::Duration;

use cachette::LruCache;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachette_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut cache = LruCache::new(3, 0.5)
        .expect("valid capacity and ttl")
        .with_eviction_listener(|key: &str, value: &String| {
            println!("  listener: dropped {key} = {value:?}");
        });

    println!("filling a capacity-3 cache with 5 entries:");
    for (key, city) in [
        ("de", "Berlin"),
        ("fr", "Paris"),
        ("es", "Madrid"),
        ("it", "Rome"),
        ("pt", "Lisbon"),
    ] {
        cache.put(key, city.to_string());
        println!("put {key} -> {city}, cache now holds {:?}", cache.keys());
    }

    // Touching an entry protects it from the next eviction.
    cache.get("it");
    cache.put("gr", "Athens".to_string());
    println!("after touching `it` and adding `gr`: {:?}", cache.keys());

    println!("\nwaiting for the 500ms TTL to lapse...");
    thread::sleep(Duration::from_millis(600));
    println!("live keys after expiry: {:?}", cache.keys());

    let stats = cache.stats();
    println!(
        "stats: {} evictions, {} expirations",
        stats.evictions(),
        stats.expirations()
    );
}
