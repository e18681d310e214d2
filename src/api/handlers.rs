//! API Handlers
//!
//! HTTP request handlers for each store server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::config::DEFAULT_MAX_VALUE_BYTES;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteManyRequest, DeleteManyResponse, DeleteResponse, EntryQuery, ExpireRequest,
    ExpireResponse, HealthResponse, KeysQuery, KeysResponse, SetResponse, StatsResponse,
};
use crate::store::KvStore;

/// Application state shared across all handlers.
///
/// Contains the store wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<KvStore>>,
    /// Largest request body the router accepts, in bytes
    pub max_value_bytes: usize,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: KvStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }

    pub fn with_max_value_bytes(mut self, max_value_bytes: usize) -> Self {
        self.max_value_bytes = max_value_bytes;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(KvStore::new())
    }
}

/// Handler for PUT /entries?key=K[&ttl_ms=N]
///
/// Stores the raw request body under `key`.
pub async fn set_handler(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.set(query.key.clone(), body.to_vec(), query.ttl_ms);
    debug!(key = %query.key, bytes = body.len(), ttl_ms = ?query.ttl_ms, "stored entry");

    Ok(Json(SetResponse::new(query.key, query.ttl_ms)))
}

/// Handler for GET /entries?key=K
///
/// Returns the raw bytes, or 404 if the key is absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> Result<Response> {
    // Write lock: reads drop expired entries and update stats
    let mut store = state.store.write().await;
    let value = store
        .get(&query.key)
        .ok_or_else(|| CacheError::KeyNotFound(query.key.clone()))?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], value).into_response())
}

/// Handler for DELETE /entries?key=K
///
/// Deleting an absent key succeeds with `deleted: false`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> Json<DeleteResponse> {
    let mut store = state.store.write().await;
    let deleted = store.delete(&query.key);

    Json(DeleteResponse {
        key: query.key,
        deleted,
    })
}

/// Handler for POST /entries/delete
pub async fn delete_many_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteManyRequest>,
) -> Json<DeleteManyResponse> {
    let mut store = state.store.write().await;
    let deleted = store.delete_many(&req.keys);
    debug!(requested = req.keys.len(), deleted, "bulk delete");

    Json(DeleteManyResponse { deleted })
}

/// Handler for POST /entries/expire
pub async fn expire_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpireRequest>,
) -> Result<Json<ExpireResponse>> {
    if req.ttl_ms == 0 {
        return Err(CacheError::InvalidRequest(
            "TTL must be at least 1 millisecond".to_string(),
        ));
    }

    let mut store = state.store.write().await;
    let updated = store.expire(&req.key, req.ttl_ms);

    Ok(Json(ExpireResponse {
        key: req.key,
        updated,
    }))
}

/// Handler for GET /keys?prefix=P
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Json<KeysResponse> {
    let store = state.store.read().await;
    Json(KeysResponse {
        keys: store.scan_prefix(&query.prefix),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    Json(StatsResponse::from(store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
