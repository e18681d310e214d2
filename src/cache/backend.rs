//! Cache Backend Interface
//!
//! [`CacheBackend`] is the byte-level contract every backend implements. It
//! is object safe, so a backend chosen at runtime can live behind
//! `Box<dyn CacheBackend>`. [`CacheExt`] layers the typed operations callers
//! use on top of it and is implemented for every backend.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::finite::ensure_finite;
use crate::cache::key::{Namespace, StorageKey};
use crate::cache::memoize::CacheDecorator;
use crate::error::Result;

// == Cache Backend ==
/// Storage contract shared by the in-memory, networked and null backends.
///
/// Implementations store opaque value bytes under fully namespaced keys and
/// decide how `max_age` is enforced.
pub trait CacheBackend: Send + Sync {
    /// Namespace all keys of this cache live in.
    fn namespace(&self) -> &Namespace;

    /// Returns the live value bytes for `key`, or None.
    fn get_raw(&self, key: &StorageKey) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`. `max_age` is never `Some(Duration::ZERO)`.
    fn put_raw(&self, key: &StorageKey, value: Vec<u8>, max_age: Option<Duration>) -> Result<()>;

    /// Removes `key` if present.
    fn delete_raw(&self, key: &StorageKey) -> Result<()>;

    /// Removes every key of this namespace and nothing outside it.
    fn delete_all(&self) -> Result<()>;

    /// Live keys of this namespace.
    fn storage_keys(&self) -> Result<Vec<StorageKey>>;
}

// == Cache Ext ==
/// Typed cache operations. Keys and values are encoded with `serde_json`.
pub trait CacheExt: CacheBackend {
    /// Returns the live value for `key`, or None if it was never set, was
    /// deleted, or has expired.
    fn get<K, V>(&self, key: &K) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let storage_key = self.namespace().encode(key)?;

        match self.get_raw(&storage_key)? {
            Some(bytes) => {
                debug!(key = %storage_key, "cache hit");
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                debug!(key = %storage_key, "cache miss");
                Ok(None)
            }
        }
    }

    /// Stores `value` under `key` and hands it back.
    ///
    /// `max_age` of None or zero means the value does not expire. Values
    /// holding NaN or an infinity fail with a serialization error, since they
    /// could not be read back.
    fn put<K, V>(&self, key: &K, value: V, max_age: Option<Duration>) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: Serialize,
    {
        let storage_key = self.namespace().encode(key)?;
        ensure_finite(&value)?;
        let bytes = serde_json::to_vec(&value)?;

        self.put_raw(&storage_key, bytes, max_age.filter(|age| !age.is_zero()))?;
        Ok(value)
    }

    /// Returns the cached value for `key`, or runs `producer` once, caches its
    /// result and returns it.
    ///
    /// `producer` is not called when a live value exists. This is not
    /// single-flight: concurrent callers missing the same key may each run
    /// their producer, and the last write wins.
    fn get_or_put<K, V, F>(&self, key: &K, producer: F, max_age: Option<Duration>) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> V,
    {
        match self.get(key)? {
            Some(value) => Ok(value),
            None => self.put(key, producer(), max_age),
        }
    }

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete<K>(&self, key: &K) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let storage_key = self.namespace().encode(key)?;
        self.delete_raw(&storage_key)
    }

    /// Live keys of this cache decoded back to their original shape.
    ///
    /// Fails with a serialization error if a stored key does not decode as
    /// `K`; use `serde_json::Value` for caches with mixed key shapes.
    fn keys<K: DeserializeOwned>(&self) -> Result<Vec<K>> {
        let namespace = self.namespace();
        self.storage_keys()?
            .iter()
            .map(|key| namespace.decode(key))
            .collect()
    }

    /// Memoizing decorator factory; see [`CacheDecorator`].
    fn cached(&self, timeout: Duration) -> CacheDecorator<'_, Self> {
        CacheDecorator::new(self, timeout)
    }
}

impl<C: CacheBackend + ?Sized> CacheExt for C {}
