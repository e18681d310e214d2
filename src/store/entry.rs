//! Stored Value Module
//!
//! Byte values held by the key-value store, each with a hard expiry deadline.

use chrono::{DateTime, TimeDelta, Utc};

// == Stored Value ==
/// A single value in the store with its optional deadline.
#[derive(Debug, Clone)]
pub struct StoredValue {
    /// The stored bytes
    pub value: Vec<u8>,
    /// When the value was written
    pub created_at: DateTime<Utc>,
    /// Deadline after which the store treats the key as gone, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredValue {
    // == Constructor ==
    /// Creates a new value with an optional TTL in milliseconds.
    pub fn new(value: Vec<u8>, ttl_ms: Option<u64>) -> Self {
        let now = Utc::now();
        Self {
            value,
            created_at: now,
            expires_at: ttl_ms.and_then(|ttl| deadline_after(now, ttl)),
        }
    }

    // == Is Expired ==
    /// Checks if the value has passed its deadline.
    ///
    /// A value is expired once the current time reaches the deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    // == Refresh TTL ==
    /// Moves the deadline to `ttl_ms` from now.
    pub fn refresh_ttl(&mut self, ttl_ms: u64) {
        self.expires_at = deadline_after(Utc::now(), ttl_ms);
    }
}

/// Deadline `ttl_ms` after `from`; None if it would overflow the calendar.
fn deadline_after(from: DateTime<Utc>, ttl_ms: u64) -> Option<DateTime<Utc>> {
    let ttl = TimeDelta::milliseconds(i64::try_from(ttl_ms).unwrap_or(i64::MAX));
    from.checked_add_signed(ttl)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_value_without_ttl_never_expires() {
        let stored = StoredValue::new(b"v".to_vec(), None);

        assert_eq!(stored.value, b"v");
        assert!(stored.expires_at.is_none());
        assert!(!stored.is_expired());
    }

    #[test]
    fn test_value_expires_after_ttl() {
        let stored = StoredValue::new(b"v".to_vec(), Some(20));
        assert!(!stored.is_expired());

        sleep(std::time::Duration::from_millis(40));

        assert!(stored.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let stored = StoredValue {
            value: Vec::new(),
            created_at: now,
            expires_at: Some(now),
        };

        assert!(stored.is_expired_at(now), "Value should be expired at its deadline");
    }

    #[test]
    fn test_refresh_ttl_extends_deadline() {
        let mut stored = StoredValue::new(b"v".to_vec(), Some(20));
        stored.refresh_ttl(10_000);

        sleep(std::time::Duration::from_millis(40));

        assert!(!stored.is_expired());
        let deadline = stored.expires_at.unwrap();
        assert!(deadline - Utc::now() > TimeDelta::seconds(9));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let stored = StoredValue::new(b"v".to_vec(), Some(u64::MAX));
        assert!(!stored.is_expired());
    }
}
