//! Firestore REST document store
//!
//! Issues `documents:runQuery` with a structured query ordered by a
//! configurable field (ties broken by document name) and resumes after the
//! marker document with a `startAt { before: false }` cursor.

use super::store::{Document, ShopStore};
use crate::auth::AccessTokenProvider;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Firestore API host
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Where and how to query shops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Field the listing is sorted by
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    DEFAULT_FIRESTORE_BASE_URL.to_string()
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    "shops".to_string()
}

fn default_order_by() -> String {
    "name".to_string()
}

fn default_page_size() -> u32 {
    20
}

impl FirestoreConfig {
    /// Config for a project with every other setting defaulted
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            project_id: project_id.into(),
            database: default_database(),
            collection: default_collection(),
            order_by: default_order_by(),
            page_size: default_page_size(),
        }
    }

    fn run_query_path(&self) -> String {
        format!(
            "/v1/projects/{}/databases/{}/documents:runQuery",
            self.project_id, self.database
        )
    }
}

/// `ShopStore` backed by Firestore
pub struct FirestoreStore {
    http: Arc<HttpClient>,
    config: FirestoreConfig,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl FirestoreStore {
    /// Create a store; `http` must use `config.base_url` as its base URL
    pub fn new(http: Arc<HttpClient>, config: FirestoreConfig) -> Self {
        Self {
            http,
            config,
            auth: None,
        }
    }

    /// Send a bearer credential with every query
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the `runQuery` request body
    pub fn build_query(&self, after: Option<&Document>) -> JsonValue {
        let mut query = json!({
            "from": [{ "collectionId": self.config.collection }],
            "orderBy": [
                { "field": { "fieldPath": self.config.order_by }, "direction": "ASCENDING" },
                { "field": { "fieldPath": "__name__" }, "direction": "ASCENDING" }
            ],
            "limit": self.config.page_size
        });

        if let Some(marker) = after {
            // Values of different types sort apart, so reuse the typed key as received
            let order_value = match &marker.order_key {
                Some(typed) => typed.clone(),
                None => marker
                    .get(&self.config.order_by)
                    .map_or_else(|| json!({ "nullValue": null }), encode_value),
            };
            query["startAt"] = json!({
                "values": [order_value, { "referenceValue": marker.name }],
                "before": false
            });
        }

        json!({ "structuredQuery": query })
    }
}

impl FirestoreStore {
    fn to_document(&self, raw: RawDocument) -> Document {
        let order_key = raw.fields.get(&self.config.order_by).cloned();
        let document = Document::new(raw.name, decode_fields(&raw.fields));
        match order_key {
            Some(typed) => document.with_order_key(typed),
            None => document,
        }
    }
}

#[async_trait]
impl ShopStore for FirestoreStore {
    async fn query_page(&self, after: Option<&Document>) -> anyhow::Result<Vec<Document>> {
        debug!(
            collection = %self.config.collection,
            after = after.map_or("<start>", Document::id),
            "Querying documents"
        );

        let mut request = RequestConfig::new().json(self.build_query(after));
        if let Some(auth) = &self.auth {
            request = request.bearer(auth.access_token().await?);
        }

        let rows: Vec<RunQueryRow> = self
            .http
            .post_json(&self.config.run_query_path(), request)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(|raw| self.to_document(raw))
            .collect())
    }
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("config", &self.config)
            .field("has_auth", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

/// One element of the `runQuery` response stream
///
/// Rows without a document carry only progress information (`readTime`).
#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: JsonObject,
}

// ============================================================================
// Value Conversion
// ============================================================================

/// Convert Firestore typed fields into plain JSON
pub(crate) fn decode_fields(fields: &JsonObject) -> JsonObject {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Convert one Firestore typed value into plain JSON
pub(crate) fn decode_value(value: &JsonValue) -> JsonValue {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return JsonValue::Null;
    };

    match kind.as_str() {
        // int64 travels as a string
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map_or_else(|| inner.clone(), JsonValue::from),
        "nullValue" => JsonValue::Null,
        "mapValue" => JsonValue::Object(
            inner
                .get("fields")
                .and_then(JsonValue::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        "arrayValue" => JsonValue::Array(
            inner
                .get("values")
                .and_then(JsonValue::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => inner.clone(),
    }
}

/// Convert plain JSON into a Firestore typed value
pub(crate) fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        JsonValue::Object(fields) => json!({
            "mapValue": {
                "fields": fields
                    .iter()
                    .map(|(k, v)| (k.clone(), encode_value(v)))
                    .collect::<JsonObject>()
            }
        }),
    }
}
