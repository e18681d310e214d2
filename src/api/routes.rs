//! API Routes
//!
//! Configures the Axum router with all store server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, delete_many_handler, expire_handler, get_handler, health_handler,
    keys_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|PUT|DELETE /entries?key=K` - Single entry operations (raw byte bodies)
/// - `POST /entries/delete` - Bulk delete
/// - `POST /entries/expire` - Reset a key's TTL
/// - `GET /keys?prefix=P` - Prefix scan
/// - `GET /stats` - Store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: `state.max_value_bytes`, larger bodies get 413
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.max_value_bytes);

    Router::new()
        .route(
            "/entries",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/entries/delete", post(delete_many_handler))
        .route("/entries/expire", post(expire_handler))
        .route("/keys", get(keys_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
