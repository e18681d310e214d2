//! Transport Module
//!
//! The minimal key-value transport the networked cache backend and the
//! session store are written against.
//!
//! # Implementations
//! - [`LocalTransport`]: in-process, over a shared [`KvStore`](crate::store::KvStore)
//! - [`HttpTransport`]: blocking HTTP client for the `crust-store` server

mod http;
mod local;

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

pub use http::HttpTransport;
pub use local::LocalTransport;

/// Converts a max age to a transport TTL: milliseconds, rounded, at least 1.
pub fn ttl_millis(max_age: Duration) -> u64 {
    let millis = (max_age.as_secs_f64() * 1000.0).round() as u64;
    millis.max(1)
}

// == Store Transport ==
/// Byte-level key-value operations with native TTL.
///
/// Each call is a single round-trip and is as atomic as the store makes it.
/// Failures surface as [`CacheError::BackendUnavailable`](crate::error::CacheError)
/// and are never retried.
pub trait StoreTransport: Send + Sync {
    /// Returns the bytes under `key`, or None if absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`. `ttl_ms` of None means no expiration.
    fn set(&self, key: &str, value: &[u8], ttl_ms: Option<u64>) -> Result<()>;

    /// Removes `key`; absent keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key in `keys`.
    fn delete_many(&self, keys: &[String]) -> Result<()>;

    /// Returns every live key starting with `prefix` (`prefix*`).
    fn scan_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Resets the TTL of an existing key. Returns false if the key is absent.
    fn expire(&self, key: &str, ttl_ms: u64) -> Result<bool>;
}

impl<T: StoreTransport + ?Sized> StoreTransport for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8], ttl_ms: Option<u64>) -> Result<()> {
        (**self).set(key, value, ttl_ms)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        (**self).delete_many(keys)
    }

    fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).scan_keys(prefix)
    }

    fn expire(&self, key: &str, ttl_ms: u64) -> Result<bool> {
        (**self).expire(key, ttl_ms)
    }
}

impl<T: StoreTransport + ?Sized> StoreTransport for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8], ttl_ms: Option<u64>) -> Result<()> {
        (**self).set(key, value, ttl_ms)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn delete_many(&self, keys: &[String]) -> Result<()> {
        (**self).delete_many(keys)
    }

    fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).scan_keys(prefix)
    }

    fn expire(&self, key: &str, ttl_ms: u64) -> Result<bool> {
        (**self).expire(key, ttl_ms)
    }
}
