//! Document types exchanged with the search store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document as it exists in (or is destined for) a concrete index.
///
/// The serde renames match the hit envelope returned by OpenSearch and
/// Elasticsearch search responses, so a `hits.hits` element deserializes
/// directly into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The concrete index the document lives in (or will be written to).
    #[serde(rename = "_index")]
    pub index: String,
    /// The document's unique identifier within the index.
    #[serde(rename = "_id")]
    pub id: String,
    /// The document body.
    #[serde(rename = "_source")]
    pub source: Value,
}

impl StoredDocument {
    /// Create a document destined for the given index.
    pub fn new(index: impl Into<String>, id: impl Into<String>, source: Value) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            source,
        }
    }

    /// Re-tag the document with a new destination index, keeping id and body.
    pub fn retarget(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }
}

/// One page of a scrolled search.
///
/// A page with no hits signals the end of the result set. The scroll id,
/// when present, fetches the next page; it must be cleared once the
/// consumer is done with the cursor.
#[derive(Debug, Clone, Default)]
pub struct ScrollPage {
    /// Cursor for the next page, if the store returned one.
    pub scroll_id: Option<String>,
    /// Documents in this page.
    pub hits: Vec<StoredDocument>,
}

impl ScrollPage {
    /// True when this page carries no documents (end of the result set).
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
