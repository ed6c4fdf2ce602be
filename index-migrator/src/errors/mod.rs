//! Error types for the migration coordinator.

mod migration_error;

pub use migration_error::{MigrationError, MigrationStep};
