//! Crust - pluggable caching with interchangeable backends
//!
//! Provides a typed cache contract over an in-memory map, a networked
//! key-value store and a no-op backend, plus a memoizing decorator and a
//! session store. The `crust-store` binary serves the key-value store over
//! HTTP for the networked backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod tasks;
pub mod transport;

pub use api::{create_router, AppState};
pub use cache::{CacheBackend, CacheExt, MemoryCache, NullCache, RemoteCache};
pub use config::{BackendKind, CacheConfig, Config};
pub use error::{CacheError, Result};
pub use session::SessionStore;
pub use tasks::spawn_cleanup_task;
pub use transport::{HttpTransport, LocalTransport, StoreTransport};
