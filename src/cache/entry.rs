//! Cache Entry Module
//!
//! Wraps a stored value with its creation timestamp so age-based expiry can
//! be decided lazily at read time.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

// == Cache Entry ==
/// A value held by the in-memory backend.
///
/// Immutable once created; every write produces a new entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Vec<u8>,
    created_at: DateTime<Utc>,
    max_age: Option<Duration>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The encoded value
    /// * `max_age` - Optional lifetime; None or zero = never expires
    pub fn new(value: Vec<u8>, max_age: Option<Duration>) -> Self {
        Self {
            value,
            created_at: Utc::now(),
            max_age: max_age.filter(|age| !age.is_zero()),
        }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its max age.
    ///
    /// An entry is expired once its age is strictly greater than `max_age`.
    /// Entries without a max age never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(max_age) = self.max_age else {
            return false;
        };

        match TimeDelta::from_std(max_age) {
            Ok(max_age) => now - self.created_at > max_age,
            // Longer than chrono can represent
            Err(_) => false,
        }
    }
}
