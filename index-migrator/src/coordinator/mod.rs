//! Index migration coordinator.
//!
//! Orchestrates the transition of a logical index name from its current
//! physical incarnation to a new concrete index with a new mapping, behind
//! an advisory lock and with unconditional lock cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::errors::{MigrationError, MigrationStep};
use crate::lock::{MigrationLock, SentinelIndexLock};
use crate::naming;
use crate::reindex::{reindex, ReindexParams};
use index_migrator_repository::{SearchStore, StoreError};
use index_migrator_shared::BulkStats;

/// Configuration for the migration coordinator.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Documents per scroll page and bulk write during the copy.
    pub batch_size: usize,
    /// Scroll cursor keep-alive window during the copy.
    pub scroll_keep_alive: String,
    /// Delete the newly created concrete index when a later step fails.
    ///
    /// Off by default: the orphan is left behind so a failed migration can
    /// be inspected. Turning this on trades diagnosability for tidiness.
    pub delete_orphan_on_failure: bool,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            scroll_keep_alive: "5m".to_string(),
            delete_orphan_on_failure: false,
        }
    }
}

impl MigratorConfig {
    /// Set the copy batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the scroll keep-alive window.
    pub fn with_scroll_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll_keep_alive = keep_alive.into();
        self
    }

    /// Enable best-effort deletion of the new index on failure.
    pub fn with_orphan_cleanup(mut self) -> Self {
        self.delete_orphan_on_failure = true;
        self
    }
}

/// Hook invoked after the corpus copy but before promotion.
///
/// Used for one-off data transforms during a migration. Side effects are the
/// caller's responsibility; the coordinator only propagates failure.
#[async_trait]
pub trait PostReindexHook: Send + Sync {
    /// Run the hook against the store, given the old logical name and the
    /// new concrete index name.
    async fn run(
        &self,
        store: &dyn SearchStore,
        old_name: &str,
        new_index: &str,
    ) -> Result<(), StoreError>;
}

/// Outcome of a successful migration.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// The new concrete index the logical name now aliases.
    pub new_index: String,
    /// Aggregate counts from the corpus copy.
    pub copied: BulkStats,
    /// Old concrete indices that were unaliased and deleted.
    pub dropped_indices: Vec<String>,
}

/// The migration coordinator.
///
/// One coordinator invocation executes strictly sequentially; concurrent
/// invocations against the same logical name are excluded by the lock, while
/// invocations against different logical names are fully independent.
pub struct IndexMigrator {
    store: Arc<dyn SearchStore>,
    config: MigratorConfig,
}

impl IndexMigrator {
    /// Create a migrator with default configuration.
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self {
            store,
            config: MigratorConfig::default(),
        }
    }

    /// Create a migrator with custom configuration.
    pub fn with_config(store: Arc<dyn SearchStore>, config: MigratorConfig) -> Self {
        Self { store, config }
    }

    /// Migrate `logical_name` to a new concrete index carrying `mapping`.
    ///
    /// Produces a new concrete index containing the mapping and all documents
    /// currently reachable under the logical name, then repoints the logical
    /// name (as an alias) at it and deletes the old indices. On failure the
    /// system is left unchanged apart from the lock cleanup, the write blocks
    /// on old indices, and (unless orphan cleanup is enabled) the new index.
    ///
    /// The optional `hook` runs after the copy but before promotion.
    ///
    /// # Errors
    ///
    /// * [`MigrationError::LockContention`] - another migration holds the
    ///   lock; nothing was changed
    /// * [`MigrationError::Step`] - a store operation failed; the lock has
    ///   been released and the error names the failed step
    #[instrument(skip(self, mapping, hook))]
    pub async fn migrate(
        &self,
        logical_name: &str,
        mapping: &Value,
        hook: Option<&dyn PostReindexHook>,
    ) -> Result<MigrationReport, MigrationError> {
        let lock = SentinelIndexLock::new(self.store.clone(), logical_name);
        if !lock.acquire().await {
            warn!(
                logical_name = %logical_name,
                "Bailing out, migration lock could not be acquired"
            );
            return Err(MigrationError::LockContention(logical_name.to_string()));
        }

        let outcome = self.run_guarded(logical_name, mapping, hook).await;

        // The one step that always executes, success or failure.
        lock.release().await;

        match &outcome {
            Ok(report) => {
                info!(
                    logical_name = %logical_name,
                    new_index = %report.new_index,
                    copied = report.copied.indexed,
                    "Migration finished"
                );
            }
            Err(e) => {
                error!(logical_name = %logical_name, error = %e, "Migration failed");
            }
        }

        outcome
    }

    /// The lock-guarded migration body (steps between acquire and release).
    async fn run_guarded(
        &self,
        logical_name: &str,
        mapping: &Value,
        hook: Option<&dyn PostReindexHook>,
    ) -> Result<MigrationReport, MigrationError> {
        use MigrationStep as Step;

        // Freeze whatever currently answers to the logical name, so no
        // documents are written behind the copy's back.
        let mut old_indexes: Vec<String> = Vec::new();
        if self
            .store
            .index_exists(logical_name)
            .await
            .map_err(MigrationError::at(Step::FreezeOldIndices))?
        {
            for index in self
                .store
                .get_alias(logical_name)
                .await
                .map_err(MigrationError::at(Step::FreezeOldIndices))?
            {
                self.store
                    .block_writes(&index)
                    .await
                    .map_err(MigrationError::at(Step::FreezeOldIndices))?;
                // A bare index answers for itself in the alias listing; its
                // removal is handled separately below.
                if index != logical_name {
                    old_indexes.push(index);
                }
            }
        }

        let new_index = naming::unique_index_name(logical_name);
        info!(new_index = %new_index, "Creating new concrete index");
        self.store
            .create_index(&new_index, None)
            .await
            .map_err(MigrationError::at(Step::CreateTarget))?;

        match self
            .promote(logical_name, &new_index, &old_indexes, mapping, hook)
            .await
        {
            Ok(copied) => Ok(MigrationReport {
                new_index,
                copied,
                dropped_indices: old_indexes,
            }),
            Err(e) => {
                if self.config.delete_orphan_on_failure {
                    if let Err(cleanup) = self.store.delete_index(&new_index).await {
                        warn!(
                            index = %new_index,
                            error = %cleanup,
                            "Failed to delete orphaned index"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Fill the new index and cut the logical name over to it.
    async fn promote(
        &self,
        logical_name: &str,
        new_index: &str,
        old_indexes: &[String],
        mapping: &Value,
        hook: Option<&dyn PostReindexHook>,
    ) -> Result<BulkStats, MigrationError> {
        use MigrationStep as Step;

        self.store
            .put_mapping(new_index, mapping)
            .await
            .map_err(MigrationError::at(Step::ApplyMapping))?;

        let store = self.store.as_ref();

        let mut copied = BulkStats::default();
        if store
            .index_exists(logical_name)
            .await
            .map_err(MigrationError::at(Step::CopyDocuments))?
        {
            let params = ReindexParams::default()
                .with_chunk_size(self.config.batch_size)
                .with_keep_alive(&self.config.scroll_keep_alive);
            copied = reindex(store, store, logical_name, new_index, &params)
                .await
                .map_err(MigrationError::at(Step::CopyDocuments))?;
            // A partial copy must never be promoted: the old indices are the
            // only remaining home of the rejected documents.
            if copied.failed > 0 {
                return Err(MigrationError::Step {
                    step: Step::CopyDocuments,
                    source: StoreError::request(format!(
                        "{} of {} documents failed to index into '{}'",
                        copied.failed,
                        copied.total(),
                        new_index
                    )),
                });
            }
            info!(
                indexed = copied.indexed,
                failed = copied.failed,
                "Copied documents to new index"
            );
        }

        if let Some(hook) = hook {
            hook.run(store, logical_name, new_index)
                .await
                .map_err(MigrationError::at(Step::PostReindexHook))?;
        }

        // An alias can only be established over a free name, so a bare
        // concrete index occupying the logical name must go first.
        if !store
            .alias_exists(logical_name)
            .await
            .map_err(MigrationError::at(Step::DropSource))?
            && store
                .index_exists(logical_name)
                .await
                .map_err(MigrationError::at(Step::DropSource))?
        {
            store
                .delete_index(logical_name)
                .await
                .map_err(MigrationError::at(Step::DropSource))?;
        }

        store
            .put_alias(logical_name, new_index)
            .await
            .map_err(MigrationError::at(Step::SwapAlias))?;

        for index in old_indexes {
            store
                .delete_alias(logical_name, index)
                .await
                .map_err(MigrationError::at(Step::DropOldIndices))?;
            store
                .delete_index(index)
                .await
                .map_err(MigrationError::at(Step::DropOldIndices))?;
        }

        Ok(copied)
    }
}
