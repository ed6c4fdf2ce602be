//! Schema divergence checking.

use serde_json::Value;

use index_migrator_repository::{SearchStore, StoreError};

/// True if the candidate mapping differs from the mapping deployed under
/// `index_name`, or if no index exists under that name yet.
///
/// Comparison is structural equality of the deployed mappings object against
/// the candidate. Used to decide whether a migration is necessary at all.
pub async fn needs_migration(
    store: &dyn SearchStore,
    index_name: &str,
    mapping: &Value,
) -> Result<bool, StoreError> {
    if store.index_exists(index_name).await? {
        let deployed = store.get_mapping(index_name).await?;
        return Ok(&deployed != mapping);
    }
    Ok(true)
}
