//! API Module
//!
//! HTTP handlers and routing for the key-value store server.
//!
//! # Endpoints
//! - `PUT /entries?key=K[&ttl_ms=N]` - Store raw bytes
//! - `GET /entries?key=K` - Retrieve raw bytes
//! - `DELETE /entries?key=K` - Delete a key
//! - `POST /entries/delete` - Delete many keys
//! - `POST /entries/expire` - Reset a key's TTL
//! - `GET /keys?prefix=P` - List live keys by prefix
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
