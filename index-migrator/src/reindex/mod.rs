//! Scroll-and-bulk document copying.
//!
//! The copy is a bounded-memory producer/consumer sequence: a scroll cursor
//! produces pages of at most `chunk_size` documents, each page is re-tagged
//! with the destination index, and a bulk write consumes it, so arbitrarily
//! large corpora never materialize in memory.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::alias::move_alias;
use crate::naming;
use index_migrator_repository::{SearchStore, StoreError};
use index_migrator_shared::{BulkStats, StoredDocument};

/// Parameters for a scroll-and-bulk copy.
#[derive(Debug, Clone)]
pub struct ReindexParams {
    /// Number of documents per scroll page and bulk write.
    pub chunk_size: usize,
    /// How long the store keeps the scroll cursor consistent between fetches.
    pub keep_alive: String,
    /// Optional query restricting the copied document set; defaults to
    /// `match_all`.
    pub query: Option<Value>,
}

impl Default for ReindexParams {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            keep_alive: "5m".to_string(),
            query: None,
        }
    }
}

impl ReindexParams {
    /// Set the number of documents per batch.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the scroll keep-alive window.
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = keep_alive.into();
        self
    }

    /// Restrict the copy to documents matching a query.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }
}

/// Copy all documents matching the query from `source_index` on
/// `source_store` to `target_index` on `target_store`.
///
/// Transfers data only, not mappings. Passing the same store twice copies
/// within one cluster; passing two stores copies across clusters. Duplicate
/// document IDs overwrite in the target. Returns aggregate write counts.
pub async fn reindex(
    source_store: &dyn SearchStore,
    target_store: &dyn SearchStore,
    source_index: &str,
    target_index: &str,
    params: &ReindexParams,
) -> Result<BulkStats, StoreError> {
    let query = params
        .query
        .clone()
        .unwrap_or_else(|| json!({ "query": { "match_all": {} } }));

    let mut stats = BulkStats::default();
    let mut page = source_store
        .scroll_start(source_index, &query, params.chunk_size, &params.keep_alive)
        .await?;
    let mut scroll_id = page.scroll_id.clone();

    while !page.is_empty() {
        let batch: Vec<StoredDocument> = page
            .hits
            .drain(..)
            .map(|doc| doc.retarget(target_index))
            .collect();
        stats.absorb(target_store.bulk_write(&batch).await?);

        let Some(id) = scroll_id.as_deref() else {
            break;
        };
        page = source_store.scroll_next(id, &params.keep_alive).await?;
        if page.scroll_id.is_some() {
            scroll_id = page.scroll_id.clone();
        }
    }

    if let Some(id) = scroll_id.as_deref() {
        // Cursor cleanup failing only wastes a keep-alive window.
        if let Err(e) = source_store.clear_scroll(id).await {
            debug!(error = %e, "Failed to clear scroll cursor");
        }
    }

    Ok(stats)
}

/// Parameters for synchronizing an index between clusters.
#[derive(Debug, Clone)]
pub struct SyncParams {
    /// Create the target under a unique generated name instead of the
    /// source name.
    pub unique: bool,
    /// Mappings/settings body for the created target index.
    pub mappings: Option<Value>,
    /// After the copy, move the alias over the new target (and drop the
    /// indices it previously pointed to). Only meaningful with `unique`.
    pub move_alias: bool,
    /// Copy parameters; the keep-alive defaults to a wide window since
    /// cross-cluster copies are slow.
    pub reindex: ReindexParams,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            unique: true,
            mappings: None,
            move_alias: false,
            reindex: ReindexParams::default().with_keep_alive("30m"),
        }
    }
}

impl SyncParams {
    /// Reuse the source name on the target cluster instead of generating one.
    pub fn in_place(mut self) -> Self {
        self.unique = false;
        self
    }

    /// Set the mappings body for the created target index.
    pub fn with_mappings(mut self, mappings: Value) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Move the alias over the new target once the copy finishes.
    pub fn with_move_alias(mut self) -> Self {
        self.move_alias = true;
        self
    }

    /// Replace the copy parameters.
    pub fn with_reindex(mut self, reindex: ReindexParams) -> Self {
        self.reindex = reindex;
        self
    }
}

/// Synchronize `index_name` from one cluster to another.
///
/// Creates the target index (uniquely named unless `in_place`), copies the
/// source corpus into it, and optionally moves the alias over it on the
/// target cluster. Returns the name of the created index.
pub async fn sync(
    source_store: &dyn SearchStore,
    target_store: &dyn SearchStore,
    index_name: &str,
    params: &SyncParams,
) -> Result<String, StoreError> {
    let name = if params.unique {
        naming::unique_index_name(index_name)
    } else {
        index_name.to_string()
    };

    info!(index = %name, "Creating index");
    target_store
        .create_index(&name, params.mappings.as_ref())
        .await?;

    info!(source = %index_name, target = %name, "Starting reindex");
    let stats = reindex(source_store, target_store, index_name, &name, &params.reindex).await?;
    info!(
        indexed = stats.indexed,
        failed = stats.failed,
        "Reindex finished"
    );

    if params.unique && params.move_alias {
        info!(alias = %index_name, index = %name, "Moving alias");
        move_alias(target_store, index_name, &name, true).await?;
    }

    Ok(name)
}
