//! Request and Response models for the store server API
//!
//! Shared by the axum handlers and the HTTP transport.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{DeleteManyRequest, EntryQuery, ExpireRequest, KeysQuery};
pub use responses::{
    DeleteManyResponse, DeleteResponse, ExpireResponse, HealthResponse, KeysResponse,
    SetResponse, StatsResponse,
};
