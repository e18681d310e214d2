//! Key-Value Store Module
//!
//! Byte-level storage engine with native per-key TTL, prefix scans and bulk
//! deletes. Backs both the in-process transport and the store server.

use std::collections::HashMap;

use crate::store::{StoreStats, StoredValue};

// == Key-Value Store ==
/// Key-value storage with hard TTL expiry.
///
/// Expired keys are never returned: reads drop them on access and
/// `cleanup_expired` sweeps the rest.
#[derive(Debug, Default)]
pub struct KvStore {
    entries: HashMap<String, StoredValue>,
    stats: StoreStats,
}

impl KvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The bytes to store
    /// * `ttl_ms` - Optional TTL in milliseconds, None = no expiration
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl_ms: Option<u64>) {
        self.entries.insert(key, StoredValue::new(value, ttl_ms));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(stored) if stored.is_expired() => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            Some(stored) => {
                let value = stored.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self
            .entries
            .remove(key)
            .is_some_and(|stored| !stored.is_expired());
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Delete Many ==
    /// Removes every key in `keys`. Returns the number of live entries removed.
    pub fn delete_many<S: AsRef<str>>(&mut self, keys: &[S]) -> usize {
        keys.iter().filter(|key| self.delete(key.as_ref())).count()
    }

    // == Scan Prefix ==
    /// Returns all live keys starting with `prefix`, sorted.
    pub fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, stored)| key.starts_with(prefix) && !stored.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Expire ==
    /// Sets a new TTL on an existing live key. Returns false if the key is absent.
    pub fn expire(&mut self, key: &str, ttl_ms: u64) -> bool {
        match self.entries.get_mut(key) {
            Some(stored) if !stored.is_expired() => {
                stored.refresh_ttl(ttl_ms);
                true
            }
            _ => false,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, stored| !stored.is_expired());
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
