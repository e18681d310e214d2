//! Response DTOs for the store server API
//!
//! Defines the JSON bodies returned by the store endpoints. Types the HTTP
//! transport reads back also derive `Deserialize`.

use serde::{Deserialize, Serialize};

use crate::store::StoreStats;

/// Response body for `PUT /entries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetResponse {
    pub key: String,
    pub ttl_ms: Option<u64>,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ttl_ms: Option<u64>) -> Self {
        Self {
            key: key.into(),
            ttl_ms,
        }
    }
}

/// Response body for `DELETE /entries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether a live entry was removed
    pub deleted: bool,
}

/// Response body for `POST /entries/delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyResponse {
    pub deleted: usize,
}

/// Response body for `POST /entries/expire`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpireResponse {
    pub key: String,
    /// False when the key did not exist
    pub updated: bool,
}

/// Response body for `GET /keys`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_response_roundtrip() {
        let resp = KeysResponse {
            keys: vec!["a".to_string(), "b".to_string()],
        };
        let json = serde_json::to_string(&resp).unwrap();
        let back: KeysResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys, resp.keys);
    }

    #[test]
    fn test_stats_response_from_stats() {
        let mut stats = StoreStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.set_total_entries(3);

        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.total_entries, 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
