//! Store Module
//!
//! The key-value store behind the networked cache backend: byte values,
//! native TTL, prefix scans and bulk deletes.

mod entry;
mod kv;
mod stats;

pub use entry::StoredValue;
pub use kv::KvStore;
pub use stats::StoreStats;
