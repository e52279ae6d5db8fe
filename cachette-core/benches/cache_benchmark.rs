use std::sync::Arc;
use std::thread;

use cachette_core::{CacheKey, CachingProxy, LruCache};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parking_lot::Mutex;

fn bench_put_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_sequential");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut cache = LruCache::new(size, 300.0).unwrap();
                for i in 0..size {
                    cache.put(format!("key{}", i), black_box(i as i32));
                }
            });
        });
    }

    group.finish();
}

fn bench_get_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hits");

    for size in [10, 100, 1000].iter() {
        let mut cache = LruCache::new(*size, 300.0).unwrap();
        for i in 0..*size {
            cache.put(format!("key{}", i), i as i32);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(cache.get(&format!("key{}", i)));
                }
            });
        });
    }

    group.finish();
}

fn bench_get_misses(c: &mut Criterion) {
    let mut cache: LruCache<i32> = LruCache::new(100, 300.0).unwrap();
    for i in 0..100 {
        cache.put(format!("key{}", i), i);
    }

    c.bench_function("get_misses", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.get(&format!("absent{}", i)));
            }
        });
    });
}

fn bench_eviction_churn(c: &mut Criterion) {
    c.bench_function("eviction_churn", |b| {
        b.iter(|| {
            // Insert 100 items into a cache of 50; every put past the
            // fill point evicts.
            let mut cache = LruCache::new(50, 300.0).unwrap();
            for i in 0..100 {
                cache.put(format!("key{}", i), black_box(i as i32));
            }
        });
    });
}

fn bench_read_heavy_workload(c: &mut Criterion) {
    c.bench_function("read_heavy_workload", |b| {
        b.iter(|| {
            // 90% reads, 10% writes against a warm cache.
            let mut cache = LruCache::new(100, 300.0).unwrap();
            for i in 0..50 {
                cache.put(format!("key{}", i), i as i32);
            }
            for i in 0..200 {
                if i % 10 == 0 {
                    cache.put(format!("key{}", i % 100), black_box(i as i32));
                } else {
                    black_box(cache.get(&format!("key{}", i % 50)));
                }
            }
        });
    });
}

fn bench_proxy_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let cache = Arc::new(Mutex::new(LruCache::new(100, 300.0).unwrap()));
                    let proxy = Arc::new(CachingProxy::new("bench_proxy", |n: u64| n * 2, cache));

                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let proxy = Arc::clone(&proxy);
                            thread::spawn(move || {
                                for i in 0..100u64 {
                                    black_box(proxy.call(i % 50));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_key_rendering(c: &mut Criterion) {
    c.bench_function("key_rendering_tuple", |b| {
        b.iter(|| {
            for i in 0..100u32 {
                black_box((i, "user", Some(i as u64)).cache_key());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_put_sequential,
    bench_get_hits,
    bench_get_misses,
    bench_eviction_churn,
    bench_read_heavy_workload,
    bench_proxy_concurrent,
    bench_key_rendering
);
criterion_main!(benches);
