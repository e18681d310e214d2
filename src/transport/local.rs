//! In-process transport over a shared [`KvStore`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{CacheError, Result};
use crate::store::KvStore;
use crate::transport::StoreTransport;

// == Local Transport ==
/// Talks to a [`KvStore`] living in the same process.
///
/// Clones share the same store, so several caches and session stores can
/// sit on one "connection".
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    store: Arc<Mutex<KvStore>>,
}

impl LocalTransport {
    /// Creates a transport over a fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over an existing shared store.
    pub fn from_store(store: Arc<Mutex<KvStore>>) -> Self {
        Self { store }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<KvStore>> {
        Arc::clone(&self.store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, KvStore>> {
        self.store
            .lock()
            .map_err(|_| CacheError::Internal("store lock poisoned".to_string()))
    }
}

impl StoreTransport for LocalTransport {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key))
    }

    fn set(&self, key: &str, value: &[u8], ttl_ms: Option<u64>) -> Result<()> {
        self.lock()?.set(key.to_string(), value.to_vec(), ttl_ms);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.delete(key);
        Ok(())
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        self.lock()?.delete_many(keys);
        Ok(())
    }

    fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self.lock()?.scan_prefix(prefix))
    }

    fn expire(&self, key: &str, ttl_ms: u64) -> Result<bool> {
        Ok(self.lock()?.expire(key, ttl_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_clones_share_the_store() {
        let transport = LocalTransport::new();
        let other = transport.clone();

        transport.set("k", b"v", None).unwrap();

        assert_eq!(other.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_ttl_is_enforced_by_the_store() {
        let transport = LocalTransport::new();

        transport.set("k", b"v", Some(10)).unwrap();
        sleep(Duration::from_millis(30));

        assert_eq!(transport.get("k").unwrap(), None);
        assert!(transport.store().lock().unwrap().is_empty());
    }

    #[test]
    fn test_scan_and_delete_many() {
        let transport = LocalTransport::new();
        transport.set("a:1", b"1", None).unwrap();
        transport.set("a:2", b"2", None).unwrap();
        transport.set("b:1", b"3", None).unwrap();

        let keys = transport.scan_keys("a:").unwrap();
        assert_eq!(keys, vec!["a:1", "a:2"]);

        transport.delete_many(&keys).unwrap();
        assert_eq!(transport.scan_keys("").unwrap(), vec!["b:1"]);
    }

    #[test]
    fn test_usable_through_arc_and_reference() {
        let transport = Arc::new(LocalTransport::new());
        let by_ref: &dyn StoreTransport = transport.as_ref();

        transport.set("k", b"v", None).unwrap();

        assert!(StoreTransport::get(&by_ref, "k").unwrap().is_some());
        assert!(!transport.expire("missing", 100).unwrap());
    }
}
