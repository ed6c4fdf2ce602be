//! # Index Migrator
//!
//! Coordinates safe transitions of a logical index name from an old physical
//! index/mapping to a new one: advisory locking via a sentinel index,
//! full-corpus scroll-and-bulk reindexing, an optional post-reindex hook, and
//! atomic alias cutover, with lock cleanup on every exit path.
//!
//! ## Architecture
//!
//! 1. **Lock**: create-if-absent sentinel index guards one migration per
//!    logical name
//! 2. **Reindex**: scroll the old corpus and bulk-write it into the new
//!    concrete index in bounded batches
//! 3. **Cutover**: repoint the alias at the new index and drop the old ones
//! 4. **Cleanup**: the lock sentinel is removed whether the migration
//!    succeeded or failed

pub mod alias;
pub mod coordinator;
pub mod errors;
pub mod lock;
pub mod naming;
pub mod reindex;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{IndexMigrator, MigrationReport, MigratorConfig, PostReindexHook};
pub use errors::{MigrationError, MigrationStep};
