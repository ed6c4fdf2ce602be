//! In-memory search store for exercising the coordinator in tests.
//!
//! Mimics the store behaviors the migration workflow depends on: atomic
//! create-if-absent index creation, alias resolution that answers with the
//! bare index itself when no alias exists, write blocking via settings, and
//! snapshot-stable scroll cursors.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use index_migrator_repository::{SearchStore, StoreError};
use index_migrator_shared::{BulkStats, ScrollPage, StoredDocument};

#[derive(Default)]
struct IndexState {
    docs: BTreeMap<String, Value>,
    mapping: Option<Value>,
    write_blocked: bool,
}

#[derive(Default)]
struct State {
    indices: BTreeMap<String, IndexState>,
    aliases: BTreeMap<String, BTreeSet<String>>,
    scrolls: HashMap<String, VecDeque<Vec<StoredDocument>>>,
    scroll_seq: u64,
    bulk_batches: Vec<usize>,
    rejected_ids: BTreeSet<String>,
}

impl State {
    /// Concrete indices a name resolves to, or None when unknown.
    fn resolve(&self, name: &str) -> Option<Vec<String>> {
        if let Some(members) = self.aliases.get(name) {
            return Some(members.iter().cloned().collect());
        }
        if self.indices.contains_key(name) {
            return Some(vec![name.to_string()]);
        }
        None
    }
}

pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub(crate) async fn seed_index(&self, name: &str, mapping: Option<Value>) {
        let mut state = self.state.lock().await;
        state.indices.insert(
            name.to_string(),
            IndexState {
                mapping,
                ..IndexState::default()
            },
        );
    }

    pub(crate) async fn seed_alias(&self, alias: &str, members: &[&str]) {
        let mut state = self.state.lock().await;
        state.aliases.insert(
            alias.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub(crate) async fn seed_docs(&self, index: &str, docs: &[(&str, Value)]) {
        let mut state = self.state.lock().await;
        let entry = state
            .indices
            .get_mut(index)
            .expect("seeding docs into a missing index");
        for (id, doc) in docs {
            entry.docs.insert(id.to_string(), doc.clone());
        }
    }

    pub(crate) async fn has_index(&self, name: &str) -> bool {
        self.state.lock().await.indices.contains_key(name)
    }

    pub(crate) async fn is_alias(&self, name: &str) -> bool {
        self.state.lock().await.aliases.contains_key(name)
    }

    pub(crate) async fn alias_members(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .aliases
            .get(name)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) async fn docs_in(&self, index: &str) -> BTreeMap<String, Value> {
        self.state
            .lock()
            .await
            .indices
            .get(index)
            .map(|entry| entry.docs.clone())
            .unwrap_or_default()
    }

    pub(crate) async fn index_names(&self) -> Vec<String> {
        self.state.lock().await.indices.keys().cloned().collect()
    }

    pub(crate) async fn bulk_batches(&self) -> Vec<usize> {
        self.state.lock().await.bulk_batches.clone()
    }

    pub(crate) async fn open_scrolls(&self) -> usize {
        self.state.lock().await.scrolls.len()
    }

    /// Make bulk writes of the given document id fail, like a mapper
    /// rejection under a stricter mapping.
    pub(crate) async fn reject_doc_id(&self, id: &str) {
        self.state.lock().await.rejected_ids.insert(id.to_string());
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state.indices.contains_key(name) || state.aliases.contains_key(name))
    }

    async fn create_index(&self, name: &str, body: Option<&Value>) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.indices.contains_key(name) || state.aliases.contains_key(name) {
            return Err(StoreError::response(
                400,
                "resource_already_exists_exception",
            ));
        }
        let mapping = body.and_then(|b| b.get("mappings")).cloned();
        state.indices.insert(
            name.to_string(),
            IndexState {
                mapping,
                ..IndexState::default()
            },
        );
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.indices.remove(name).is_none() {
            return Err(StoreError::response(404, "index_not_found_exception"));
        }
        // Deleting an index also drops its alias memberships.
        for members in state.aliases.values_mut() {
            members.remove(name);
        }
        state.aliases.retain(|_, members| !members.is_empty());
        Ok(())
    }

    async fn alias_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.aliases.contains_key(name))
    }

    async fn get_alias(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let state = self.state.lock().await;
        state
            .resolve(name)
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))
    }

    async fn put_alias(&self, alias: &str, index: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.indices.contains_key(alias) {
            return Err(StoreError::response(
                400,
                "an index exists with the same name as the alias",
            ));
        }
        if !state.indices.contains_key(index) {
            return Err(StoreError::response(404, "index_not_found_exception"));
        }
        state
            .aliases
            .entry(alias.to_string())
            .or_default()
            .insert(index.to_string());
        Ok(())
    }

    async fn delete_alias(&self, alias: &str, index: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let members = state
            .aliases
            .get_mut(alias)
            .ok_or_else(|| StoreError::response(404, "aliases_not_found_exception"))?;
        if !members.remove(index) {
            return Err(StoreError::response(404, "aliases_not_found_exception"));
        }
        if members.is_empty() {
            state.aliases.remove(alias);
        }
        Ok(())
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let entry = state
            .indices
            .get_mut(index)
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))?;
        if let Some(blocked) = settings.get("index.blocks.write").and_then(Value::as_bool) {
            entry.write_blocked = blocked;
        }
        Ok(())
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let entry = state
            .indices
            .get_mut(index)
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))?;
        entry.mapping = Some(mapping.clone());
        Ok(())
    }

    async fn get_mapping(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.lock().await;
        let concrete = state
            .resolve(name)
            .and_then(|indices| indices.into_iter().next())
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))?;
        let entry = state
            .indices
            .get(&concrete)
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))?;
        Ok(entry.mapping.clone().unwrap_or_else(|| Value::Object(Default::default())))
    }

    async fn scroll_start(
        &self,
        index: &str,
        _query: &Value,
        batch_size: usize,
        _keep_alive: &str,
    ) -> Result<ScrollPage, StoreError> {
        let mut state = self.state.lock().await;
        let concrete = state
            .resolve(index)
            .ok_or_else(|| StoreError::response(404, "index_not_found_exception"))?;

        // Snapshot at cursor-open time, like a real scroll.
        let mut all: Vec<StoredDocument> = Vec::new();
        for name in &concrete {
            if let Some(entry) = state.indices.get(name) {
                for (id, doc) in &entry.docs {
                    all.push(StoredDocument::new(name.clone(), id.clone(), doc.clone()));
                }
            }
        }

        let mut pages: VecDeque<Vec<StoredDocument>> = VecDeque::new();
        for chunk in all.chunks(batch_size.max(1)) {
            pages.push_back(chunk.to_vec());
        }

        state.scroll_seq += 1;
        let scroll_id = format!("scroll-{}", state.scroll_seq);
        let first = pages.pop_front().unwrap_or_default();
        state.scrolls.insert(scroll_id.clone(), pages);

        Ok(ScrollPage {
            scroll_id: Some(scroll_id),
            hits: first,
        })
    }

    async fn scroll_next(
        &self,
        scroll_id: &str,
        _keep_alive: &str,
    ) -> Result<ScrollPage, StoreError> {
        let mut state = self.state.lock().await;
        let pages = state
            .scrolls
            .get_mut(scroll_id)
            .ok_or_else(|| StoreError::response(404, "search_context_missing_exception"))?;
        let hits = pages.pop_front().unwrap_or_default();
        Ok(ScrollPage {
            scroll_id: Some(scroll_id.to_string()),
            hits,
        })
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), StoreError> {
        self.state.lock().await.scrolls.remove(scroll_id);
        Ok(())
    }

    async fn bulk_write(&self, documents: &[StoredDocument]) -> Result<BulkStats, StoreError> {
        let mut state = self.state.lock().await;
        state.bulk_batches.push(documents.len());

        let mut stats = BulkStats::default();
        for doc in documents {
            if state.rejected_ids.contains(&doc.id) {
                stats.failed += 1;
                continue;
            }
            match state.indices.get_mut(&doc.index) {
                Some(entry) if !entry.write_blocked => {
                    entry.docs.insert(doc.id.clone(), doc.source.clone());
                    stats.indexed += 1;
                }
                // Missing or write-blocked destination: the item fails, the
                // batch does not.
                _ => stats.failed += 1,
            }
        }
        Ok(stats)
    }
}
