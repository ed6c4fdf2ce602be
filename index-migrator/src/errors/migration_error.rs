//! Migration error types.
//!
//! A failed migration names the step it failed in, rather than collapsing
//! everything into a single success/failure bit.

use std::fmt;

use thiserror::Error;

use index_migrator_repository::StoreError;

/// The phase of a migration in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// Enumerating old indices and blocking writes on them.
    FreezeOldIndices,
    /// Creating the new concrete index.
    CreateTarget,
    /// Applying the target mapping to the new index.
    ApplyMapping,
    /// Copying the corpus into the new index.
    CopyDocuments,
    /// Running the caller-supplied post-reindex hook.
    PostReindexHook,
    /// Deleting a bare (non-aliased) index occupying the logical name.
    DropSource,
    /// Repointing the alias at the new index.
    SwapAlias,
    /// Unaliasing and deleting the old indices.
    DropOldIndices,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FreezeOldIndices => "freezing writes on old indices",
            Self::CreateTarget => "creating new concrete index",
            Self::ApplyMapping => "applying target mapping",
            Self::CopyDocuments => "copying documents",
            Self::PostReindexHook => "post-reindex hook",
            Self::DropSource => "deleting bare source index",
            Self::SwapAlias => "repointing alias",
            Self::DropOldIndices => "dropping old indices",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during an index migration.
#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    /// Another migration holds the lock for this logical name. Nothing was
    /// changed.
    #[error("migration already in progress for '{0}'")]
    LockContention(String),

    /// A store operation failed inside the guarded migration body. The lock
    /// has been released.
    #[error("{step} failed: {source}")]
    Step {
        step: MigrationStep,
        #[source]
        source: StoreError,
    },
}

impl MigrationError {
    /// Build a mapper attributing a store error to a migration step.
    pub fn at(step: MigrationStep) -> impl FnOnce(StoreError) -> MigrationError {
        move |source| MigrationError::Step { step, source }
    }

    /// The step this error occurred in, if it is a step failure.
    pub fn step(&self) -> Option<MigrationStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            Self::LockContention(_) => None,
        }
    }
}
