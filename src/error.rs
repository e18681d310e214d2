//! Error types for the cache library and the store server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache backends, transports and the store server.
///
/// A missing key is not an error for `get`-style lookups, those return
/// `Ok(None)`. `KeyNotFound` is reserved for indexed access.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The underlying store could not be reached or answered unexpectedly
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A key or value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Indexed access on a key that is not present
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Namespace prefix contains a reserved character
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Serialization(_)
            | CacheError::InvalidNamespace(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
