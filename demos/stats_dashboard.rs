//! A small statistics dashboard over every registered cache.

use cachette::{invalidate_all_caches, memoize, stats_registry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[memoize(name = "geometry", capacity = 8)]
fn circle_area(radius_mm: u64) -> f64 {
    std::f64::consts::PI * (radius_mm as f64).powi(2)
}

#[memoize(name = "greetings", capacity = 4, ttl = 10.0)]
fn greet(name: String) -> String {
    format!("hello, {name}!")
}

#[memoize(name = "parity", capacity = 2)]
fn is_even(n: u64) -> bool {
    n % 2 == 0
}

fn print_dashboard() {
    let mut names = stats_registry::list();
    names.sort();

    println!("{:<12} {:>6} {:>6} {:>9} {:>9} {:>8}", "cache", "hits", "misses", "evictions", "expired", "hit rate");
    for name in names {
        if let Some(stats) = stats_registry::get(&name) {
            println!(
                "{:<12} {:>6} {:>6} {:>9} {:>9} {:>7.1}%",
                name,
                stats.hits(),
                stats.misses(),
                stats.evictions(),
                stats.expirations(),
                stats.hit_rate() * 100.0
            );
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachette_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    for radius in [1, 2, 3, 1, 2, 3, 10] {
        circle_area(radius);
    }
    for name in ["ada", "grace", "ada", "linus"] {
        greet(name.to_string());
    }
    // A capacity of 2 forces churn here.
    for n in 0..6 {
        is_even(n);
    }

    print_dashboard();

    let cleared = invalidate_all_caches();
    println!("\ncleared {cleared} caches; counters are cumulative:");
    print_dashboard();
}
