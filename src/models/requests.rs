//! Request DTOs for the store server API
//!
//! Defines query strings and JSON bodies accepted by the store endpoints.

use serde::{Deserialize, Serialize};

/// Query string for the single-entry endpoints (`/entries`)
///
/// # Fields
/// - `key`: The storage key
/// - `ttl_ms`: Optional TTL in milliseconds, only read by PUT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryQuery {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

impl EntryQuery {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ttl_ms: None,
        }
    }

    pub fn with_ttl(mut self, ttl_ms: Option<u64>) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.ttl_ms == Some(0) {
            return Some("TTL must be at least 1 millisecond".to_string());
        }
        None
    }
}

/// Query string for `GET /keys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeysQuery {
    #[serde(default)]
    pub prefix: String,
}

/// Request body for `POST /entries/delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyRequest {
    pub keys: Vec<String>,
}

/// Request body for `POST /entries/expire`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpireRequest {
    pub key: String,
    /// New TTL in milliseconds, counted from now
    pub ttl_ms: u64,
}
