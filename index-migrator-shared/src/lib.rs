//! # Index Migrator Shared
//!
//! Shared types and data structures for the index migrator workspace.
//! These types cross the boundary between the store connection crate and
//! the migration coordinator.

mod document;
mod stats;

pub use document::{ScrollPage, StoredDocument};
pub use stats::BulkStats;
