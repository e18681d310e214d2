//! Key Codec Module
//!
//! Turns `(prefix, user key)` into a namespaced storage key and back.
//!
//! A storage key is `prefix + ":" + json(user_key)`. User keys go through
//! `serde_json::Value` first, whose maps are ordered, so composite keys
//! encode identically regardless of field or insertion order. The prefix may
//! not contain `:` (or the scan wildcard `*`), so the first `:` always ends
//! the namespace and two namespaces never share a key.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::cache::finite::ensure_finite;
use crate::error::{CacheError, Result};

/// Separates the namespace prefix from the encoded user key.
pub const NAMESPACE_SEPARATOR: char = ':';

const RESERVED_PREFIX_CHARS: [char; 2] = [NAMESPACE_SEPARATOR, '*'];

// == Namespace ==
/// Validated key prefix scoping one logical cache inside a shared store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
    scan_prefix: String,
}

impl Namespace {
    /// Creates a namespace, rejecting prefixes with reserved characters.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if let Some(c) = prefix.chars().find(|c| RESERVED_PREFIX_CHARS.contains(c)) {
            return Err(CacheError::InvalidNamespace(format!(
                "prefix {:?} contains reserved character {:?}",
                prefix, c
            )));
        }

        let scan_prefix = format!("{}{}", prefix, NAMESPACE_SEPARATOR);
        Ok(Self {
            prefix,
            scan_prefix,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix every storage key of this namespace starts with.
    pub fn scan_prefix(&self) -> &str {
        &self.scan_prefix
    }

    // == Encode ==
    /// Derives the storage key for `key`.
    ///
    /// Keys holding NaN or an infinity are rejected; JSON would write them
    /// all as `null`.
    pub fn encode<K: Serialize + ?Sized>(&self, key: &K) -> Result<StorageKey> {
        ensure_finite(key)?;
        let canonical = serde_json::to_value(key)?;
        let encoded = serde_json::to_string(&canonical)?;
        Ok(StorageKey(format!("{}{}", self.scan_prefix, encoded)))
    }

    /// Whether `storage_key` belongs to this namespace.
    pub fn owns(&self, storage_key: &str) -> bool {
        storage_key.starts_with(&self.scan_prefix)
    }

    // == Decode ==
    /// Recovers the user key from one of this namespace's storage keys.
    pub fn decode<K: DeserializeOwned>(&self, storage_key: &StorageKey) -> Result<K> {
        let encoded = storage_key
            .as_str()
            .strip_prefix(&self.scan_prefix)
            .ok_or_else(|| {
                CacheError::InvalidNamespace(format!(
                    "key {:?} is outside namespace {:?}",
                    storage_key.as_str(),
                    self.prefix
                ))
            })?;

        Ok(serde_json::from_str(encoded)?)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            scan_prefix: NAMESPACE_SEPARATOR.to_string(),
        }
    }
}

// == Storage Key ==
/// Fully namespaced key as written to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wraps a key read back from a backend's own listing.
    pub(crate) fn from_stored(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
