//! Search store trait definition.
//!
//! This module defines the abstract interface for the index lifecycle and
//! document transfer operations the migrator needs, allowing for different
//! backend implementations (OpenSearch, Elasticsearch, in-memory fakes).

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::StoreError;
use index_migrator_shared::{BulkStats, ScrollPage, StoredDocument};

/// Abstracts the connection to the search store.
///
/// Every method maps to one synchronous remote call and raises `StoreError`
/// on transport or store-level failure. The store performs no retries;
/// timeout and retry policy belong to the caller.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Check whether a name exists, treating aliases and concrete indices
    /// uniformly.
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Create an index, optionally with a settings/mappings body.
    ///
    /// Creation is atomic: it fails if the name is already taken, which is
    /// what makes it usable as a create-if-absent lock primitive.
    async fn create_index(&self, name: &str, body: Option<&Value>) -> Result<(), StoreError>;

    /// Delete an index by name.
    async fn delete_index(&self, name: &str) -> Result<(), StoreError>;

    /// Check whether a name exists as an alias.
    async fn alias_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Return the concrete index names currently reachable under `name`.
    ///
    /// For an alias this is its member set; for a bare concrete index the
    /// store answers with the index itself.
    async fn get_alias(&self, name: &str) -> Result<Vec<String>, StoreError>;

    /// Add `index` to the alias `alias`, creating the alias if needed.
    ///
    /// Fails if `alias` is already occupied by a concrete index.
    async fn put_alias(&self, alias: &str, index: &str) -> Result<(), StoreError>;

    /// Remove `index` from the alias `alias`.
    async fn delete_alias(&self, alias: &str, index: &str) -> Result<(), StoreError>;

    /// Apply dynamic settings to an index.
    async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), StoreError>;

    /// Apply a mapping to an index.
    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), StoreError>;

    /// Return the mappings object deployed on the index (or on the single
    /// index behind an alias).
    async fn get_mapping(&self, name: &str) -> Result<Value, StoreError>;

    /// Open a scrolled search over `index` and return the first page.
    ///
    /// The cursor gives a stable view over the full matching set; pages are
    /// bounded by `batch_size`. An empty page signals the end of the set.
    async fn scroll_start(
        &self,
        index: &str,
        query: &Value,
        batch_size: usize,
        keep_alive: &str,
    ) -> Result<ScrollPage, StoreError>;

    /// Fetch the next page of an open scroll.
    async fn scroll_next(&self, scroll_id: &str, keep_alive: &str)
        -> Result<ScrollPage, StoreError>;

    /// Release an open scroll cursor.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), StoreError>;

    /// Write a batch of documents, each tagged with its destination index.
    ///
    /// Writes are at-least-once: a duplicate document ID overwrites rather
    /// than duplicates. Returns aggregate success/failure counts.
    async fn bulk_write(&self, documents: &[StoredDocument]) -> Result<BulkStats, StoreError>;

    /// Block writes to an index, leaving reads available.
    async fn block_writes(&self, index: &str) -> Result<(), StoreError> {
        self.put_settings(index, &json!({ "index.blocks.write": true }))
            .await
    }

    /// Unblock writes to an index.
    async fn unblock_writes(&self, index: &str) -> Result<(), StoreError> {
        self.put_settings(index, &json!({ "index.blocks.write": false }))
            .await
    }
}
