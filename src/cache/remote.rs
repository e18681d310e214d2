//! Networked Backend
//!
//! Cache over a [`StoreTransport`]. Expiry is the store's job: `max_age` is
//! sent along as a millisecond TTL and expired keys are simply never
//! returned, so nothing is checked client-side.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheBackend, Namespace, StorageKey};
use crate::error::Result;
use crate::transport::{ttl_millis, StoreTransport};

// == Remote Cache ==
/// Cache backend for a shared key-value store.
///
/// The transport is owned by the caller's choice of `T` (pass an `Arc` or a
/// reference to share one connection). Transport failures propagate as
/// `BackendUnavailable` and are not retried.
#[derive(Debug, Clone)]
pub struct RemoteCache<T> {
    transport: T,
    namespace: Namespace,
    debug: bool,
}

impl<T: StoreTransport> RemoteCache<T> {
    /// Creates a cache writing under `prefix` in the transport's store.
    pub fn new(transport: T, prefix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            transport,
            namespace: Namespace::new(prefix)?,
            debug: false,
        })
    }

    /// When enabled, logs value sizes and round-trip times at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: StoreTransport> CacheBackend for RemoteCache<T> {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn get_raw(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        let started = Instant::now();
        let value = self.transport.get(key.as_str())?;

        if self.debug {
            if let Some(bytes) = &value {
                debug!(
                    key = %key,
                    size = bytes.len(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "cache value fetched"
                );
            }
        }
        Ok(value)
    }

    fn put_raw(&self, key: &StorageKey, value: Vec<u8>, max_age: Option<Duration>) -> Result<()> {
        let ttl_ms = max_age.map(ttl_millis);
        if self.debug {
            debug!(key = %key, size = value.len(), ttl_ms = ?ttl_ms, "cache value stored");
        }
        self.transport.set(key.as_str(), &value, ttl_ms)
    }

    fn delete_raw(&self, key: &StorageKey) -> Result<()> {
        self.transport.delete(key.as_str())
    }

    /// Scans then bulk-deletes. Not atomic: keys written after the scan
    /// survive, keys removed in between are deleted again harmlessly.
    fn delete_all(&self) -> Result<()> {
        let keys = self.transport.scan_keys(self.namespace.scan_prefix())?;
        if keys.is_empty() {
            return Ok(());
        }

        debug!(prefix = self.namespace.prefix(), count = keys.len(), "clearing namespace");
        self.transport.delete_many(&keys)
    }

    fn storage_keys(&self) -> Result<Vec<StorageKey>> {
        Ok(self
            .transport
            .scan_keys(self.namespace.scan_prefix())?
            .into_iter()
            .map(StorageKey::from_stored)
            .collect())
    }
}
