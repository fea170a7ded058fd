//! Document store abstraction

use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::RwLock;

/// A raw record as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full resource name; the id is its last path segment
    pub name: String,
    /// Field values as plain JSON
    pub fields: JsonObject,
    /// Sort field value in the store's own typed encoding, when it has one
    pub order_key: Option<JsonValue>,
}

impl Document {
    /// Create a document
    pub fn new(name: impl Into<String>, fields: JsonObject) -> Self {
        Self {
            name: name.into(),
            fields,
            order_key: None,
        }
    }

    /// Attach the typed value the store sorted this document by
    #[must_use]
    pub fn with_order_key(mut self, order_key: JsonValue) -> Self {
        self.order_key = Some(order_key);
        self
    }

    /// Server-assigned identifier
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Decode the fields into a record, exposing the id as `document_id`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut fields = self.fields.clone();
        fields
            .entry("document_id")
            .or_insert_with(|| JsonValue::String(self.id().to_string()));
        Ok(serde_json::from_value(JsonValue::Object(fields))?)
    }
}

/// Source of record pages
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Fetch the page that follows `after`, or the first page when `None`
    async fn query_page(&self, after: Option<&Document>) -> anyhow::Result<Vec<Document>>;
}

/// Ordered in-memory collection
#[derive(Debug)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
    page_size: usize,
}

impl MemoryStore {
    /// Create a store serving pages of `page_size` documents
    pub fn new(documents: Vec<Document>, page_size: usize) -> Self {
        Self {
            documents: RwLock::new(documents),
            page_size: page_size.max(1),
        }
    }

    /// Append a document at the end of the collection
    pub fn push(&self, document: Document) {
        self.documents
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(document);
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn query_page(&self, after: Option<&Document>) -> anyhow::Result<Vec<Document>> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let start = match after {
            Some(marker) => documents
                .iter()
                .position(|d| d.name == marker.name)
                .map(|i| i + 1)
                .ok_or_else(|| anyhow::anyhow!("Unknown document: {}", marker.name))?,
            None => 0,
        };

        Ok(documents
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}
