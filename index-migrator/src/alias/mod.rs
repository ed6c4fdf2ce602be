//! Alias repointing.

use tracing::info;

use index_migrator_repository::{SearchStore, StoreError};

/// Move `alias_name` to point at `index_name`, removing all other members.
///
/// With `drop = true`, the indices removed from the alias are also deleted.
/// The new index is added before the old ones are removed, so the logical
/// name never resolves to nothing.
pub async fn move_alias(
    store: &dyn SearchStore,
    alias_name: &str,
    index_name: &str,
    drop: bool,
) -> Result<(), StoreError> {
    let old_indexes: Vec<String> = if store.index_exists(alias_name).await? {
        store
            .get_alias(alias_name)
            .await?
            .into_iter()
            .filter(|i| i != index_name)
            .collect()
    } else {
        Vec::new()
    };

    info!(index = %index_name, alias = %alias_name, "Adding new index to alias");
    store.put_alias(alias_name, index_name).await?;

    for index in &old_indexes {
        info!(index = %index, alias = %alias_name, "Removing index from alias");
        store.delete_alias(alias_name, index).await?;
        if drop {
            info!(index = %index, "Deleting index");
            store.delete_index(index).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_move_alias_with_drop_deletes_old_index() {
        let store = MemoryStore::new();
        store.seed_index("users-old", None).await;
        store.seed_index("users-new", None).await;
        store.seed_alias("users", &["users-old"]).await;

        move_alias(&store, "users", "users-new", true).await.unwrap();

        assert_eq!(store.alias_members("users").await, vec!["users-new"]);
        assert!(!store.has_index("users-old").await);
    }

    #[tokio::test]
    async fn test_move_alias_without_drop_keeps_old_index() {
        let store = MemoryStore::new();
        store.seed_index("users-old", None).await;
        store.seed_index("users-new", None).await;
        store.seed_alias("users", &["users-old"]).await;

        move_alias(&store, "users", "users-new", false)
            .await
            .unwrap();

        assert_eq!(store.alias_members("users").await, vec!["users-new"]);
        assert!(store.has_index("users-old").await);
    }

    #[tokio::test]
    async fn test_move_alias_fresh_name_just_adds() {
        let store = MemoryStore::new();
        store.seed_index("users-new", None).await;

        move_alias(&store, "users", "users-new", true).await.unwrap();

        assert_eq!(store.alias_members("users").await, vec!["users-new"]);
    }

    #[tokio::test]
    async fn test_move_alias_already_member_is_kept() {
        let store = MemoryStore::new();
        store.seed_index("users-a", None).await;
        store.seed_index("users-b", None).await;
        store.seed_alias("users", &["users-a", "users-b"]).await;
        store
            .seed_docs("users-a", &[("1", json!({ "name": "Ada" }))])
            .await;

        move_alias(&store, "users", "users-b", true).await.unwrap();

        assert_eq!(store.alias_members("users").await, vec!["users-b"]);
        assert!(!store.has_index("users-a").await);
        assert!(store.has_index("users-b").await);
    }
}
