//! Advisory migration locking.
//!
//! The lock is abstracted behind a trait so a lease-based distributed lock
//! can be substituted without changing the coordinator.

mod sentinel;

pub use sentinel::SentinelIndexLock;

use async_trait::async_trait;

/// A mutual-exclusion primitive backed by an atomic create-if-absent
/// operation against an external store.
///
/// The lock is advisory: a crashed holder leaves it behind, requiring
/// out-of-band cleanup.
#[async_trait]
pub trait MigrationLock: Send + Sync {
    /// Attempt to acquire the lock.
    ///
    /// Returns `false` when the lock is already held or acquisition failed
    /// for any reason; a failed acquisition must leave no state behind.
    async fn acquire(&self) -> bool;

    /// Release the lock.
    ///
    /// Release failures are logged and swallowed so they never mask the
    /// outcome of the work the lock protected.
    async fn release(&self);
}
