//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a plain vector model and to
//! verify the capacity, ordering and expiry properties.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_CAPACITY: usize = 50;
const LONG_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn small_key_strategy() -> impl Strategy<Value = String> {
    "[a-h]".prop_map(|s| s)
}

/// Generates distinct-looking cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32, ttl_ms: u64 },
    Get { key: String },
    Remove { key: String },
    Advance { ms: u64 },
    Purge,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (small_key_strategy(), any::<u32>(), 0u64..40)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Set { key, value, ttl_ms }),
        4 => small_key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => small_key_strategy().prop_map(|key| CacheOp::Remove { key }),
        2 => (1u64..20).prop_map(|ms| CacheOp::Advance { ms }),
        1 => Just(CacheOp::Purge),
    ]
}

// == Reference Model ==
/// Front of the vector = most recently used. Deadlines in virtual milliseconds.
#[derive(Debug, Default)]
struct Model {
    entries: Vec<(String, u32, u64)>,
    capacity: usize,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _, _)| k == key)
    }

    fn set(&mut self, key: String, value: u32, deadline: u64) {
        if let Some(pos) = self.position(&key) {
            self.entries.remove(pos);
        } else if self.entries.len() >= self.capacity {
            self.entries.pop();
        }
        self.entries.insert(0, (key, value, deadline));
    }

    fn get(&mut self, key: &str, now: u64) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos);
        if now >= entry.2 {
            return None;
        }
        let value = entry.1;
        self.entries.insert(0, entry);
        Some(value)
    }

    fn remove(&mut self, key: &str, now: u64) -> Option<u32> {
        let pos = self.position(key)?;
        let (_, value, deadline) = self.entries.remove(pos);
        (now < deadline).then_some(value)
    }

    fn purge(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, _, deadline)| now < *deadline);
        before - self.entries.len()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation leaves the store in the same observable state as the
    // model: same results, same recency order, table and list in sync.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let base = Instant::now();
        let mut clock_ms = 0u64;
        let mut store: CacheStore<String, u32> = CacheStore::new(capacity).unwrap();
        let mut model = Model { capacity, ..Model::default() };

        for op in ops {
            let now = base + Duration::from_millis(clock_ms);
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    store.set(key.clone(), value, Duration::from_millis(ttl_ms), now);
                    model.set(key, value, clock_ms + ttl_ms);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key, now), model.get(&key, clock_ms));
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key, now), model.remove(&key, clock_ms));
                }
                CacheOp::Advance { ms } => clock_ms += ms,
                CacheOp::Purge => {
                    prop_assert_eq!(store.purge_expired(now), model.purge(clock_ms));
                }
            }

            store.assert_consistent();
            prop_assert_eq!(store.keys_by_recency(), model.keys());
            prop_assert_eq!(store.len(), model.entries.len());
        }
    }

    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let base = Instant::now();
        let mut clock_ms = 0u64;
        let mut store: CacheStore<String, u32> = CacheStore::new(4).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            let now = base + Duration::from_millis(clock_ms);
            match op {
                CacheOp::Set { key, value, ttl_ms } => {
                    store.set(key, value, Duration::from_millis(ttl_ms), now);
                }
                CacheOp::Get { key } => match store.get(&key, now) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Remove { key } => {
                    store.remove(&key, now);
                }
                CacheOp::Advance { ms } => clock_ms += ms,
                CacheOp::Purge => {
                    store.purge_expired(now);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in any::<u32>(),
        value2 in any::<u32>()
    ) {
        let now = Instant::now();
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_CAPACITY).unwrap();

        store.set(key.clone(), value1, LONG_TTL, now);
        store.set(key.clone(), value2, LONG_TTL, now);

        prop_assert_eq!(store.get(&key, now), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), any::<u32>()), 1..200)
    ) {
        let now = Instant::now();
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_CAPACITY).unwrap();

        for (key, value) in entries {
            store.set(key, value, LONG_TTL, now);
            prop_assert!(
                store.len() <= TEST_CAPACITY,
                "Cache size {} exceeds capacity {}",
                store.len(),
                TEST_CAPACITY
            );
        }
    }

    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in any::<u32>(),
        ttl_ms in 1u64..10_000
    ) {
        let now = Instant::now();
        let mut store: CacheStore<String, u32> = CacheStore::new(TEST_CAPACITY).unwrap();
        let ttl = Duration::from_millis(ttl_ms);

        store.set(key.clone(), value, ttl, now);

        prop_assert_eq!(store.get(&key, now + ttl - Duration::from_millis(1)), Some(value));
        prop_assert_eq!(store.get(&key, now + ttl), None, "Entry should be expired once TTL elapses");
        prop_assert!(store.is_empty());
    }

    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        new_key in valid_key_strategy()
    ) {
        // Deduplicate keys while keeping insertion order
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let now = Instant::now();
        let capacity = unique_keys.len();
        let mut store: CacheStore<String, u32> = CacheStore::new(capacity).unwrap();

        for (i, key) in unique_keys.iter().enumerate() {
            store.set(key.clone(), i as u32, LONG_TTL, now);
        }

        let evicted = store.set(new_key.clone(), 0, LONG_TTL, now);

        prop_assert_eq!(evicted.as_ref(), Some(&unique_keys[0]));
        prop_assert_eq!(store.len(), capacity);
        prop_assert!(store.contains_key(&new_key, now));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(store.contains_key(key, now), "Key '{}' should still exist", key);
        }
    }

    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy()
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let now = Instant::now();
        let mut store: CacheStore<String, u32> = CacheStore::new(unique_keys.len()).unwrap();
        for (i, key) in unique_keys.iter().enumerate() {
            store.set(key.clone(), i as u32, LONG_TTL, now);
        }

        // Reading the oldest key makes the second one the eviction candidate
        prop_assert!(store.get(&unique_keys[0], now).is_some());
        let evicted = store.set(new_key, 0, LONG_TTL, now);

        prop_assert_eq!(evicted.as_ref(), Some(&unique_keys[1]));
        prop_assert!(store.contains_key(&unique_keys[0], now));
    }
}
