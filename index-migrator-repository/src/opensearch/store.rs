//! OpenSearch store implementation.
//!
//! This module provides the concrete implementation of `SearchStore`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesDeleteAliasParts, IndicesDeleteParts, IndicesExistsAliasParts,
        IndicesExistsParts, IndicesGetAliasParts, IndicesGetMappingParts, IndicesPutAliasParts,
        IndicesPutMappingParts, IndicesPutSettingsParts,
    },
    BulkParts, ClearScrollParts, OpenSearch, ScrollParts, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::StoreError;
use crate::interfaces::SearchStore;
use crate::opensearch::response::{BulkResponse, SearchResponse};
use index_migrator_shared::{BulkStats, ScrollPage, StoredDocument};

/// OpenSearch implementation of the search store connection.
///
/// # Example
///
/// ```ignore
/// let store = OpenSearchStore::new("http://localhost:9200").await?;
/// if !store.index_exists("users").await? {
///     store.create_index("users", None).await?;
/// }
/// ```
pub struct OpenSearchStore {
    client: OpenSearch,
}

impl OpenSearchStore {
    /// Create a new store connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchStore)` - A new store instance
    /// * `Err(StoreError)` - If connection setup fails
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        let parsed_url = Url::parse(url).map_err(|e| StoreError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch store");

        Ok(Self { client })
    }

    /// Wrap an already-configured OpenSearch client.
    pub fn from_client(client: OpenSearch) -> Self {
        Self { client }
    }
}

/// Surface a non-success response as a structured error, reading the body
/// for diagnostics.
async fn ensure_success(response: Response, operation: &str) -> Result<Response, StoreError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, operation, "Store request failed");
    Err(StoreError::response(status.as_u16(), body))
}

/// Build the alternating action/document line sequence for a bulk request.
fn bulk_lines(documents: &[StoredDocument]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(documents.len() * 2);
    for doc in documents {
        lines.push(json!({ "index": { "_index": doc.index, "_id": doc.id } }));
        lines.push(doc.source.clone());
    }
    lines
}

/// Tally per-item outcomes of a bulk response into aggregate counts.
fn bulk_stats(response: &BulkResponse) -> BulkStats {
    let mut stats = BulkStats::default();
    for item in &response.items {
        if item.index.error.is_none() && item.index.status < 300 {
            stats.indexed += 1;
        } else {
            stats.failed += 1;
        }
    }
    stats
}

/// Pull the mappings object out of a get-mapping response, which the store
/// keys by concrete index name.
fn extract_mappings(name: &str, response: &Value) -> Result<Value, StoreError> {
    response
        .as_object()
        .and_then(|entries| entries.values().next())
        .and_then(|entry| entry.get("mappings"))
        .cloned()
        .ok_or_else(|| StoreError::parse(format!("no mappings returned for '{}'", name)))
}

#[async_trait]
impl SearchStore for OpenSearchStore {
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::response(status.as_u16(), body))
            }
        }
    }

    async fn create_index(&self, name: &str, body: Option<&Value>) -> Result<(), StoreError> {
        let response = match body {
            Some(body) => {
                self.client
                    .indices()
                    .create(IndicesCreateParts::Index(name))
                    .body(body.clone())
                    .send()
                    .await
            }
            None => {
                self.client
                    .indices()
                    .create(IndicesCreateParts::Index(name))
                    .send()
                    .await
            }
        }
        .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "create_index").await?;
        debug!(index = %name, "Index created");
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "delete_index").await?;
        debug!(index = %name, "Index deleted");
        Ok(())
    }

    async fn alias_exists(&self, name: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .indices()
            .exists_alias(IndicesExistsAliasParts::Name(&[name]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::response(status.as_u16(), body))
            }
        }
    }

    async fn get_alias(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let response = ensure_success(response, "get_alias").await?;
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        // The response is keyed by the concrete indices behind the name.
        Ok(body
            .as_object()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn put_alias(&self, alias: &str, index: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(&[index], alias))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "put_alias").await?;
        debug!(alias = %alias, index = %index, "Alias added");
        Ok(())
    }

    async fn delete_alias(&self, alias: &str, index: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .delete_alias(IndicesDeleteAliasParts::IndexName(&[index], &[alias]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "delete_alias").await?;
        debug!(alias = %alias, index = %index, "Alias removed");
        Ok(())
    }

    async fn put_settings(&self, index: &str, settings: &Value) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "put_settings").await?;
        Ok(())
    }

    async fn put_mapping(&self, index: &str, mapping: &Value) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mapping.clone())
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "put_mapping").await?;
        Ok(())
    }

    async fn get_mapping(&self, name: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let response = ensure_success(response, "get_mapping").await?;
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        extract_mappings(name, &body)
    }

    async fn scroll_start(
        &self,
        index: &str,
        query: &Value,
        batch_size: usize,
        keep_alive: &str,
    ) -> Result<ScrollPage, StoreError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .scroll(keep_alive)
            .size(batch_size as i64)
            .body(query.clone())
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let response = ensure_success(response, "scroll_start").await?;
        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        Ok(body.into())
    }

    async fn scroll_next(
        &self,
        scroll_id: &str,
        keep_alive: &str,
    ) -> Result<ScrollPage, StoreError> {
        let response = self
            .client
            .scroll(ScrollParts::None)
            .body(json!({ "scroll": keep_alive, "scroll_id": scroll_id }))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let response = ensure_success(response, "scroll_next").await?;
        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        Ok(body.into())
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .clear_scroll(ClearScrollParts::None)
            .body(json!({ "scroll_id": [scroll_id] }))
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        ensure_success(response, "clear_scroll").await?;
        Ok(())
    }

    async fn bulk_write(&self, documents: &[StoredDocument]) -> Result<BulkStats, StoreError> {
        if documents.is_empty() {
            return Ok(BulkStats::default());
        }

        let body: Vec<JsonBody<Value>> = bulk_lines(documents)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::request(e.to_string()))?;

        let response = ensure_success(response, "bulk_write").await?;
        let body = response
            .json::<BulkResponse>()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        let stats = bulk_stats(&body);
        debug!(
            indexed = stats.indexed,
            failed = stats.failed,
            "Bulk write finished"
        );
        Ok(stats)
    }
}
