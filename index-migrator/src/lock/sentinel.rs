//! Sentinel-index implementation of the migration lock.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::lock::MigrationLock;
use crate::naming;
use index_migrator_repository::SearchStore;

/// Lock backed by the existence of a sentinel index.
///
/// Acquisition creates `<logical_name>_migration`; index creation is atomic
/// in the store, so a second acquirer fails cleanly. Release deletes the
/// sentinel.
pub struct SentinelIndexLock {
    store: Arc<dyn SearchStore>,
    lock_index: String,
}

impl SentinelIndexLock {
    /// Create a lock for the given logical index name.
    pub fn new(store: Arc<dyn SearchStore>, logical_name: &str) -> Self {
        Self {
            store,
            lock_index: naming::lock_index_name(logical_name),
        }
    }

    /// The name of the sentinel index backing this lock.
    pub fn lock_index(&self) -> &str {
        &self.lock_index
    }
}

#[async_trait]
impl MigrationLock for SentinelIndexLock {
    async fn acquire(&self) -> bool {
        debug!(lock = %self.lock_index, "Acquiring migration lock");
        match self.store.create_index(&self.lock_index, None).await {
            Ok(()) => true,
            Err(e) => {
                warn!(lock = %self.lock_index, error = %e, "Could not acquire migration lock");
                false
            }
        }
    }

    async fn release(&self) {
        debug!(lock = %self.lock_index, "Cleaning up migration lock");
        if let Err(e) = self.store.delete_index(&self.lock_index).await {
            warn!(lock = %self.lock_index, error = %e, "Failed to release migration lock");
        }
    }
}
