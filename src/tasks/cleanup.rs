//! TTL Sweep Task
//!
//! Background task that periodically drops expired store entries so that
//! keys nobody reads again do not linger in memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::KvStore;

/// Spawns a background task that sweeps expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Returns the task handle so shutdown can abort it.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(KvStore::new()));
/// let handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<RwLock<KvStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
