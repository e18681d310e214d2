//! Property-Based Tests for the Cache Module
//!
//! Uses proptest to check the backend contract against the in-memory backend
//! and the networked backend over an in-process store.

use proptest::prelude::*;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

use crate::cache::{CacheBackend, CacheExt, MemoryCache, RemoteCache};
use crate::transport::LocalTransport;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ :/\"{}]{0,24}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{0,8}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Delete { key: String },
    DeleteAll,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so deletes and overwrites actually hit
    let key = "[a-d]{1,2}";
    prop_oneof![
        6 => (key, value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        3 => key.prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::DeleteAll),
    ]
}

/// One of each backend that keeps values, freshly built.
fn backends(prefix: &str) -> Vec<Box<dyn CacheBackend>> {
    vec![
        Box::new(MemoryCache::new(prefix).unwrap()),
        Box::new(RemoteCache::new(LocalTransport::new(), prefix).unwrap()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round-trip: put then get returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        for cache in backends("prop") {
            prop_assert_eq!(cache.put(&key, value.clone(), None).unwrap(), value.clone());
            let retrieved: Option<String> = cache.get(&key).unwrap();
            prop_assert_eq!(retrieved, Some(value.clone()));
        }
    }

    // Composite keys round-trip regardless of how the map was built.
    #[test]
    fn prop_composite_key_roundtrip(
        fields in prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 1..8),
        value in any::<i64>()
    ) {
        let forward: HashMap<String, i64> = fields.iter().cloned().collect();
        let backward: HashMap<String, i64> = fields.iter().rev().cloned().collect();
        prop_assume!(forward == backward);

        for cache in backends("prop") {
            cache.put(&forward, value, None).unwrap();
            prop_assert_eq!(cache.get::<_, i64>(&backward).unwrap(), Some(value));
            prop_assert_eq!(cache.keys::<HashMap<String, i64>>().unwrap(), vec![forward.clone()]);
        }
    }

    // A key never set reads as absent.
    #[test]
    fn prop_missing_key_is_absent(key in key_strategy()) {
        for cache in backends("prop") {
            prop_assert_eq!(cache.get::<_, String>(&key).unwrap(), None);
        }
    }

    // Delete then get is absent, whether or not the key existed.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy(), existed in any::<bool>()) {
        for cache in backends("prop") {
            if existed {
                cache.put(&key, value.clone(), None).unwrap();
            }
            cache.delete(&key).unwrap();
            cache.delete(&key).unwrap();
            prop_assert_eq!(cache.get::<_, String>(&key).unwrap(), None);
        }
    }

    // The producer runs once on a miss and never on a hit.
    #[test]
    fn prop_get_or_put_compute_once(key in key_strategy(), value in value_strategy(), preloaded in any::<bool>()) {
        for cache in backends("prop") {
            if preloaded {
                cache.put(&key, value.clone(), None).unwrap();
            }

            let calls = Cell::new(0);
            let produced = cache
                .get_or_put(&key, || { calls.set(calls.get() + 1); value.clone() }, None)
                .unwrap();

            prop_assert_eq!(produced, value.clone());
            prop_assert_eq!(calls.get(), if preloaded { 0 } else { 1 });

            let again = cache
                .get_or_put(&key, || { calls.set(calls.get() + 1); String::new() }, None)
                .unwrap();
            prop_assert_eq!(again, value.clone());
            prop_assert_eq!(calls.get(), if preloaded { 0 } else { 1 });
        }
    }

    // keys() matches a model of the live key set after any op sequence.
    #[test]
    fn prop_keys_match_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        for cache in backends("prop") {
            let mut model = BTreeSet::new();

            for op in &ops {
                match op {
                    CacheOp::Put { key, value } => {
                        cache.put(key, value.clone(), None).unwrap();
                        model.insert(key.clone());
                    }
                    CacheOp::Delete { key } => {
                        cache.delete(key).unwrap();
                        model.remove(key);
                    }
                    CacheOp::DeleteAll => {
                        cache.delete_all().unwrap();
                        model.clear();
                    }
                }
            }

            let keys: BTreeSet<String> = cache.keys::<String>().unwrap().into_iter().collect();
            prop_assert_eq!(keys, model);
        }
    }

    // delete_all clears its own namespace and nothing else in a shared store.
    #[test]
    fn prop_delete_all_is_namespaced(
        prefix_a in prefix_strategy(),
        prefix_b in prefix_strategy(),
        keys in prop::collection::vec(key_strategy(), 1..10)
    ) {
        prop_assume!(prefix_a != prefix_b);

        let transport = LocalTransport::new();
        let memory_a = MemoryCache::new(prefix_a.as_str()).unwrap();
        let pairs: Vec<(Box<dyn CacheBackend>, Box<dyn CacheBackend>)> = vec![
            (
                Box::new(memory_a.clone()),
                Box::new(MemoryCache::with_shared_map(prefix_b.as_str(), memory_a.shared_map()).unwrap()),
            ),
            (
                Box::new(RemoteCache::new(transport.clone(), prefix_a.as_str()).unwrap()),
                Box::new(RemoteCache::new(transport.clone(), prefix_b.as_str()).unwrap()),
            ),
        ];

        for (a, b) in pairs {
            for key in &keys {
                a.put(key, 1, None).unwrap();
                b.put(key, 2, None).unwrap();
            }

            a.delete_all().unwrap();

            prop_assert!(a.keys::<String>().unwrap().is_empty());
            for key in &keys {
                prop_assert_eq!(a.get::<_, i32>(key).unwrap(), None);
                prop_assert_eq!(b.get::<_, i32>(key).unwrap(), Some(2));
            }
        }
    }
}

// == Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error variant renders as JSON with a string "error" field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let rt = tokio::runtime::Runtime::new().unwrap();
        let error_variants = vec![
            CacheError::BackendUnavailable(error_msg.clone()),
            CacheError::KeyNotFound(error_msg.clone()),
            CacheError::InvalidNamespace(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::Internal(error_msg.clone()),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async { to_bytes(response.into_body(), usize::MAX).await.unwrap() });
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Concurrent Access ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Readers racing writers on a shared MemoryCache only ever see a complete
    // value that some writer stored.
    #[test]
    fn prop_concurrent_reads_see_whole_values(
        values in prop::collection::vec("[a-z]{8}", 2..8)
    ) {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(MemoryCache::new("concurrent").unwrap());
        let mut handles = Vec::new();

        for value in values.clone() {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for _ in 0..20 {
                    cache.put("shared", value.clone(), None).unwrap();
                    if let Some(seen) = cache.get::<_, String>("shared").unwrap() {
                        assert_eq!(seen.len(), 8);
                    }
                }
            }));
        }

        for handle in handles {
            prop_assert!(handle.join().is_ok(), "Worker panicked");
        }

        let last: String = cache.get("shared").unwrap().unwrap();
        prop_assert!(values.contains(&last));
    }
}
