//! Cache Module
//!
//! A uniform cache contract over interchangeable backends:
//! - [`MemoryCache`]: local map, expiry checked lazily on read
//! - [`RemoteCache`]: shared key-value store, expiry enforced by the store
//! - [`NullCache`]: caches nothing
//!
//! Every backend implements [`CacheBackend`]; the typed operations
//! (`get`, `put`, `get_or_put`, `delete`, `keys`, `cached`) come from
//! [`CacheExt`].
//!
//! ```ignore
//! use crust::cache::{CacheExt, MemoryCache};
//!
//! let cache = MemoryCache::new("reports")?;
//! let total: u64 = cache.get_or_put("total", || expensive_total(), None)?;
//! ```

mod backend;
mod entry;
mod finite;
mod key;
mod memoize;
mod memory;
mod null;
mod remote;

#[cfg(test)]
mod property_tests;

pub use backend::{CacheBackend, CacheExt};
pub use entry::CacheEntry;
pub(crate) use finite::ensure_finite;
pub use key::{Namespace, StorageKey, NAMESPACE_SEPARATOR};
pub use memoize::{CacheDecorator, Memoized};
pub use memory::{MemoryCache, SharedMap};
pub use null::NullCache;
pub use remote::RemoteCache;
