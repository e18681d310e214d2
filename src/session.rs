//! Session Store
//!
//! Indexed-access session storage over a [`StoreTransport`]. Unlike the
//! cache, reading a missing session is an error, and every read or write
//! pushes the session's expiry `timeout` further out.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::ensure_finite;
use crate::error::{CacheError, Result};
use crate::transport::{ttl_millis, StoreTransport};

/// Key prefix used when none is given.
pub const DEFAULT_SESSION_PREFIX: &str = "sessions_";

/// Inactivity timeout used when a zero timeout is given (one day).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

// == Session Store ==
/// Sessions keyed by id, expired by the store after `timeout` of inactivity.
#[derive(Debug, Clone)]
pub struct SessionStore<T> {
    transport: T,
    key_prefix: String,
    timeout: Duration,
}

impl<T: StoreTransport> SessionStore<T> {
    /// Creates a store using [`DEFAULT_SESSION_PREFIX`].
    ///
    /// A zero `timeout` falls back to [`DEFAULT_SESSION_TIMEOUT`].
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self::with_prefix(transport, DEFAULT_SESSION_PREFIX, timeout)
    }

    /// A zero `timeout` falls back to [`DEFAULT_SESSION_TIMEOUT`].
    pub fn with_prefix(transport: T, key_prefix: impl Into<String>, timeout: Duration) -> Self {
        let timeout = if timeout.is_zero() {
            DEFAULT_SESSION_TIMEOUT
        } else {
            timeout
        };

        Self {
            transport,
            key_prefix: key_prefix.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn make_key(&self, session_id: &str) -> String {
        format!("{}{}", self.key_prefix, session_id)
    }

    /// Whether a non-empty session exists for `session_id`.
    pub fn contains(&self, session_id: &str) -> Result<bool> {
        let data = self.transport.get(&self.make_key(session_id))?;
        Ok(data.is_some_and(|bytes| !bytes.is_empty()))
    }

    // == Get ==
    /// Loads a session and refreshes its expiry.
    ///
    /// Fails with `KeyNotFound` when the session is missing, expired or empty.
    pub fn get<V: DeserializeOwned>(&self, session_id: &str) -> Result<V> {
        let key = self.make_key(session_id);
        let data = self
            .transport
            .get(&key)?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| CacheError::KeyNotFound(key.clone()))?;

        self.transport.expire(&key, ttl_millis(self.timeout))?;
        Ok(serde_json::from_slice(&data)?)
    }

    // == Set ==
    /// Stores a session, resetting its expiry.
    pub fn set<V: Serialize + ?Sized>(&self, session_id: &str, value: &V) -> Result<()> {
        let key = self.make_key(session_id);
        ensure_finite(value)?;
        let data = serde_json::to_vec(value)?;

        debug!(key = %key, size = data.len(), "session stored");
        self.transport
            .set(&key, &data, Some(ttl_millis(self.timeout)))
    }

    /// Deletes a session; deleting an unknown id is not an error.
    pub fn remove(&self, session_id: &str) -> Result<()> {
        self.transport.delete(&self.make_key(session_id))
    }

    /// Nothing to do: the store expires sessions itself.
    pub fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}
