//! Typed envelopes for OpenSearch response bodies.

use serde::Deserialize;

use index_migrator_shared::{ScrollPage, StoredDocument};

/// Body of a search or scroll response, reduced to what the migrator needs.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_scroll_id")]
    pub scroll_id: Option<String>,
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsEnvelope {
    pub hits: Vec<StoredDocument>,
}

impl From<SearchResponse> for ScrollPage {
    fn from(response: SearchResponse) -> Self {
        ScrollPage {
            scroll_id: response.scroll_id,
            hits: response.hits.hits,
        }
    }
}

/// Body of a bulk response. Every action this crate issues is an `index`
/// action, so items only carry that key.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    pub items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItem {
    pub index: BulkItemStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemStatus {
    pub status: u16,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}
