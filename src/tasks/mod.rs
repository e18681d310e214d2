//! Background Tasks Module
//!
//! Tasks the store server runs alongside the HTTP listener.
//!
//! # Tasks
//! - TTL Sweep: Removes expired store entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
