//! Property-based tests for the cache engine.
//!
//! Each property replays a generated workload against a model of the
//! documented behavior and checks that the cache agrees.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::clock::ManualClock;
use crate::lru_cache::LruCache;

const TEST_CAPACITY: usize = 100;
const TEST_DEFAULT_TTL: f64 = 300.0;

/// Generates cache keys (non-empty, word characters only).
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates cache values.
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the counters match a replay of the
    // same operations: one hit per successful get, one miss per failed
    // get, nothing counted for puts or invalidations. The workload is too
    // small to overflow the capacity, so evictions stay at zero.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut cache = LruCache::new(TEST_CAPACITY, TEST_DEFAULT_TTL).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put(key, value);
                }
                CacheOp::Get { key } => {
                    match cache.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Invalidate { key } => {
                    let _ = cache.invalidate(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits(), expected_hits, "hits mismatch");
        prop_assert_eq!(stats.misses(), expected_misses, "misses mismatch");
        prop_assert_eq!(stats.evictions(), 0, "nothing should have been evicted");
        prop_assert_eq!(stats.total_accesses(), expected_hits + expected_misses);

        let hit_rate = stats.hit_rate();
        prop_assert!((0.0..=1.0).contains(&hit_rate), "hit rate out of range: {}", hit_rate);
    }

    // For any key-value pair, a put followed by a get (within the TTL)
    // returns exactly the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut cache = LruCache::new(TEST_CAPACITY, TEST_DEFAULT_TTL).unwrap();
        cache.put(key.clone(), value.clone());
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // For any stored key, invalidation reports presence and a subsequent
    // get misses.
    #[test]
    fn prop_invalidate_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut cache = LruCache::new(TEST_CAPACITY, TEST_DEFAULT_TTL).unwrap();
        cache.put(key.clone(), value);

        prop_assert!(cache.invalidate(&key));
        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(!cache.invalidate(&key), "second invalidation must miss");
    }

    // For any key, storing v1 then v2 leaves a single entry holding v2,
    // with no eviction involved.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut cache = LruCache::new(TEST_CAPACITY, TEST_DEFAULT_TTL).unwrap();
        cache.put(key.clone(), value1);
        cache.put(key.clone(), value2.clone());

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.stats().evictions(), 0);
    }

    // For any sequence of puts, the entry count never exceeds capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let capacity = 50;
        let mut cache = LruCache::new(capacity, TEST_DEFAULT_TTL).unwrap();

        for (key, value) in entries {
            cache.put(key, value);
            prop_assert!(
                cache.len() <= capacity,
                "cache size {} exceeds capacity {}",
                cache.len(),
                capacity
            );
        }
    }

    // Filling the cache and inserting one more key evicts exactly the
    // oldest entry; everything else survives.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = LruCache::new(capacity, TEST_DEFAULT_TTL).unwrap();

        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            cache.put(key.clone(), format!("value_{}", key));
        }
        prop_assert_eq!(cache.len(), capacity);

        cache.put(new_key.clone(), new_value);

        prop_assert_eq!(cache.len(), capacity, "still at capacity after eviction");
        prop_assert_eq!(cache.stats().evictions(), 1, "exactly one eviction");
        prop_assert!(cache.get(&oldest_key).is_none(), "oldest key '{}' survived", oldest_key);
        prop_assert!(cache.get(&new_key).is_some());
        for key in unique_keys.iter().skip(1) {
            prop_assert!(cache.get(key).is_some(), "key '{}' was wrongly evicted", key);
        }
    }

    // Reading a key saves it from eviction; the victim is the next-oldest.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = LruCache::new(capacity, TEST_DEFAULT_TTL).unwrap();

        for key in &unique_keys {
            cache.put(key.clone(), format!("value_{}", key));
        }

        let accessed_key = unique_keys[0].clone();
        let _ = cache.get(&accessed_key);

        let expected_victim = unique_keys[1].clone();
        cache.put(new_key.clone(), new_value);

        prop_assert!(
            cache.get(&accessed_key).is_some(),
            "accessed key '{}' should have been saved from eviction",
            accessed_key
        );
        prop_assert!(
            cache.get(&expected_victim).is_none(),
            "key '{}' should have been the victim",
            expected_victim
        );
        prop_assert!(cache.get(&new_key).is_some());
    }

    // Full behavioral check: replay a workload against a recency-ordered
    // model (front = oldest) and require the cache to agree on every get,
    // every invalidation, and the final key order.
    #[test]
    fn prop_matches_recency_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let capacity = 5;
        let mut cache = LruCache::new(capacity, TEST_DEFAULT_TTL).unwrap();
        let mut model: Vec<(String, String)> = Vec::new();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    if let Some(pos) = model.iter().position(|(k, _)| *k == key) {
                        model.remove(pos);
                    } else if model.len() == capacity {
                        model.remove(0);
                    }
                    model.push((key.clone(), value.clone()));
                    cache.put(key, value);
                }
                CacheOp::Get { key } => {
                    let expected = model.iter().position(|(k, _)| *k == key);
                    let got = cache.get(&key);
                    match expected {
                        Some(pos) => {
                            let entry = model.remove(pos);
                            prop_assert_eq!(got.as_deref(), Some(entry.1.as_str()));
                            model.push(entry);
                        }
                        None => prop_assert_eq!(got, None),
                    }
                }
                CacheOp::Invalidate { key } => {
                    let expected = model.iter().position(|(k, _)| *k == key);
                    let removed = cache.invalidate(&key);
                    prop_assert_eq!(removed, expected.is_some());
                    if let Some(pos) = expected {
                        model.remove(pos);
                    }
                }
            }
        }

        let model_keys: Vec<String> = model.iter().map(|(k, _)| k.clone()).collect();
        prop_assert_eq!(cache.keys(), model_keys, "final recency order diverged");
        prop_assert_eq!(cache.len(), model.len());
    }
}

// Separate block for TTL properties; the manual clock keeps them exact,
// so boundary cases can be asserted rather than slept through.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // For any TTL, an entry is still served at an age exactly equal to the
    // TTL and gone one millisecond later, counting one expiration and one
    // miss.
    #[test]
    fn prop_ttl_expiration_boundary(
        key in key_strategy(),
        value in value_strategy(),
        ttl_millis in 1u64..5_000
    ) {
        let clock = ManualClock::new();
        let ttl_seconds = ttl_millis as f64 / 1000.0;
        let mut cache = LruCache::with_clock(TEST_CAPACITY, ttl_seconds, clock.clone()).unwrap();

        cache.put(key.clone(), value.clone());

        clock.advance(Duration::from_millis(ttl_millis));
        prop_assert_eq!(cache.get(&key), Some(value), "entry at exact TTL age must be live");

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(cache.get(&key), None, "entry past its TTL must be gone");

        let stats = cache.stats();
        prop_assert_eq!(stats.expirations(), 1);
        prop_assert_eq!(stats.misses(), 1);
        prop_assert_eq!(stats.hits(), 1);
    }

    // A per-put TTL wins over the cache default, in both directions.
    #[test]
    fn prop_ttl_override(
        key in key_strategy(),
        value in value_strategy(),
        default_ttl_millis in 10u64..1_000,
        override_ttl_millis in 10u64..1_000
    ) {
        prop_assume!(default_ttl_millis != override_ttl_millis);

        let clock = ManualClock::new();
        let mut cache = LruCache::with_clock(
            TEST_CAPACITY,
            default_ttl_millis as f64 / 1000.0,
            clock.clone(),
        )
        .unwrap();

        cache
            .put_with_ttl(key.clone(), value.clone(), override_ttl_millis as f64 / 1000.0)
            .unwrap();

        // Just past the override deadline the entry must be gone; just
        // before it, it must be live, regardless of the cache default.
        clock.advance(Duration::from_millis(override_ttl_millis));
        prop_assert_eq!(cache.get(&key), Some(value));

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(cache.get(&key), None);
    }
}
