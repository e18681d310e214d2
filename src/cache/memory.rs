//! In-Memory Backend
//!
//! Cache over a local map with lazy expiry: entries remember when they were
//! written and `get` decides whether they are still live. Expired entries
//! stay in the map until overwritten, deleted or cleared by `delete_all`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::cache::{CacheBackend, CacheEntry, Namespace, StorageKey};
use crate::error::{CacheError, Result};

/// Map that several [`MemoryCache`] instances with different prefixes can share.
pub type SharedMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

// == Memory Cache ==
/// In-process cache backend.
///
/// Each instance gets its own map unless built with
/// [`MemoryCache::with_shared_map`]. Clones share storage.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    namespace: Namespace,
    entries: SharedMap,
}

impl MemoryCache {
    /// Creates a cache with its own private map.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        Self::with_shared_map(prefix, SharedMap::default())
    }

    /// Creates a cache over `entries`, alongside any other namespaces in it.
    pub fn with_shared_map(prefix: impl Into<String>, entries: SharedMap) -> Result<Self> {
        Ok(Self {
            namespace: Namespace::new(prefix)?,
            entries,
        })
    }

    /// Handle to the underlying map, for sharing with other instances.
    pub fn shared_map(&self) -> SharedMap {
        Arc::clone(&self.entries)
    }

    /// Entries physically held for this namespace, expired ones included.
    pub fn stored_len(&self) -> Result<usize> {
        let entries = self.read()?;
        Ok(entries
            .keys()
            .filter(|key| self.namespace.owns(key))
            .count())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .read()
            .map_err(|_| CacheError::Internal("memory cache lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .write()
            .map_err(|_| CacheError::Internal("memory cache lock poisoned".to_string()))
    }
}

impl CacheBackend for MemoryCache {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn get_raw(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        let entries = self.read()?;
        Ok(entries
            .get(key.as_str())
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value().to_vec()))
    }

    fn put_raw(&self, key: &StorageKey, value: Vec<u8>, max_age: Option<Duration>) -> Result<()> {
        self.write()?
            .insert(key.as_str().to_string(), CacheEntry::new(value, max_age));
        Ok(())
    }

    fn delete_raw(&self, key: &StorageKey) -> Result<()> {
        self.write()?.remove(key.as_str());
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        self.write()?.retain(|key, _| !self.namespace.owns(key));
        Ok(())
    }

    fn storage_keys(&self) -> Result<Vec<StorageKey>> {
        let entries = self.read()?;
        let mut keys: Vec<StorageKey> = entries
            .iter()
            .filter(|(key, entry)| self.namespace.owns(key) && !entry.is_expired())
            .map(|(key, _)| StorageKey::from_stored(key.clone()))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheExt;
    use std::thread::sleep;

    #[test]
    fn test_expired_entry_stays_until_overwritten() {
        let cache = MemoryCache::new("cache_test").unwrap();

        cache
            .put("bar", 1, Some(Duration::from_millis(1)))
            .unwrap();
        sleep(Duration::from_millis(10));

        assert_eq!(cache.get::<_, i32>("bar").unwrap(), None);
        assert!(cache.keys::<String>().unwrap().is_empty());
        assert_eq!(cache.stored_len().unwrap(), 1, "Expiry is lazy");

        cache.put("bar", 2, None).unwrap();
        assert_eq!(cache.get::<_, i32>("bar").unwrap(), Some(2));
        assert_eq!(cache.stored_len().unwrap(), 1);
    }

    #[test]
    fn test_delete_all_clears_expired_entries_too() {
        let cache = MemoryCache::new("cache_test").unwrap();

        cache
            .put("old", 1, Some(Duration::from_millis(1)))
            .unwrap();
        sleep(Duration::from_millis(10));
        cache.delete_all().unwrap();

        assert_eq!(cache.stored_len().unwrap(), 0);
    }

    #[test]
    fn test_instances_are_isolated_by_default() {
        let a = MemoryCache::new("same").unwrap();
        let b = MemoryCache::new("same").unwrap();

        a.put("k", 1, None).unwrap();

        assert_eq!(b.get::<_, i32>("k").unwrap(), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let a = MemoryCache::new("same").unwrap();
        let b = a.clone();

        a.put("k", 1, None).unwrap();

        assert_eq!(b.get::<_, i32>("k").unwrap(), Some(1));
    }

    #[test]
    fn test_shared_map_delete_all_is_namespaced() {
        let users = MemoryCache::new("users").unwrap();
        let posts = MemoryCache::with_shared_map("posts", users.shared_map()).unwrap();

        users.put("bar", 1, None).unwrap();
        posts.put("bar", 2, None).unwrap();

        users.delete_all().unwrap();

        assert_eq!(users.get::<_, i32>("bar").unwrap(), None);
        assert_eq!(posts.get::<_, i32>("bar").unwrap(), Some(2));
        assert_eq!(posts.keys::<String>().unwrap(), vec!["bar"]);
    }

    #[test]
    fn test_non_finite_float_keys_do_not_collide() {
        let cache = MemoryCache::new("floats").unwrap();

        assert!(matches!(
            cache.put(&f64::NAN, 1, None),
            Err(CacheError::Serialization(_))
        ));
        assert!(cache.put(&f64::INFINITY, 2, None).is_err());
        cache.put(&(), 3, None).unwrap();

        assert!(cache.get::<_, i32>(&f64::NEG_INFINITY).is_err());
        assert_eq!(cache.get::<_, i32>(&()).unwrap(), Some(3));
        assert_eq!(cache.stored_len().unwrap(), 1);
    }

    #[test]
    fn test_non_finite_float_values_are_not_stored() {
        let cache = MemoryCache::new("floats").unwrap();

        assert!(matches!(
            cache.put("k", f64::NAN, None),
            Err(CacheError::Serialization(_))
        ));
        assert!(cache.put("k", vec![1.0, f64::INFINITY], None).is_err());
        assert_eq!(cache.get::<_, f64>("k").unwrap(), None);

        cache.put("k", 0.5, None).unwrap();
        assert_eq!(cache.get::<_, f64>("k").unwrap(), Some(0.5));
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(matches!(
            MemoryCache::new("bad:prefix"),
            Err(CacheError::InvalidNamespace(_))
        ));
    }
}
