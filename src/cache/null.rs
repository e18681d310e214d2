//! Null Backend
//!
//! Caches nothing. Swap it in to turn caching off (per-test isolation, for
//! instance) without touching calling code.

use std::time::Duration;

use crate::cache::{CacheBackend, Namespace, StorageKey};
use crate::error::Result;

/// Backend that never retains a value.
#[derive(Debug, Clone, Default)]
pub struct NullCache {
    namespace: Namespace,
}

impl NullCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for NullCache {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn get_raw(&self, _key: &StorageKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn put_raw(&self, _key: &StorageKey, _value: Vec<u8>, _max_age: Option<Duration>) -> Result<()> {
        Ok(())
    }

    fn delete_raw(&self, _key: &StorageKey) -> Result<()> {
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        Ok(())
    }

    fn storage_keys(&self) -> Result<Vec<StorageKey>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheExt;
    use std::cell::Cell;

    #[test]
    fn test_none_cache() {
        let cache = NullCache::new();

        assert_eq!(cache.get::<_, i32>("foo").unwrap(), None);
        assert_eq!(cache.put("foo", 1, None).unwrap(), 1);
        assert_eq!(cache.get::<_, i32>("foo").unwrap(), None);
        assert_eq!(cache.get_or_put("foo", || 1 + 1, None).unwrap(), 2);
        cache.delete("a").unwrap();
        cache.delete_all().unwrap();
        assert!(cache.keys::<String>().unwrap().is_empty());
    }

    #[test]
    fn test_producer_runs_every_time() {
        let cache = NullCache::new();
        let calls = Cell::new(0);

        for expected in 1..=3 {
            let value = cache
                .get_or_put(
                    "k",
                    || {
                        calls.set(calls.get() + 1);
                        calls.get()
                    },
                    Some(Duration::from_secs(60)),
                )
                .unwrap();
            assert_eq!(value, expected);
        }
    }
}
