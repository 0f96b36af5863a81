//! Document store seam.
//!
//! Collections hold schemaless JSON documents addressed by string ids. The
//! console only ever talks to [`DocumentStore`], so the bundled in-process
//! backend and a hosted document database are interchangeable behind
//! `Arc<dyn DocumentStore>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// A stored document: one flat JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Failures surfaced by a document store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    Missing { collection: String, id: String },
    #[error("collection '{0}' is unavailable")]
    Unavailable(String),
    #[error("filtered queries on '{0}' are unavailable")]
    QueryUnavailable(String),
    #[error("{0}")]
    Backend(String),
}

/// Marker key of the server-clock sentinel.
pub const SERVER_TIMESTAMP_KEY: &str = "__serverTimestamp";

/// Field value a writer stores when the backend clock should supply the
/// timestamp. Stores replace it during the write; it never survives into a
/// read.
pub fn server_timestamp() -> Value {
    json!({ SERVER_TIMESTAMP_KEY: true })
}

pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .map(|map| map.len() == 1 && map.get(SERVER_TIMESTAMP_KEY).and_then(Value::as_bool) == Some(true))
        .unwrap_or(false)
}

/// Replace every top-level sentinel in `doc` with `now`. Stores call this on
/// their write path; nested objects are left alone.
pub fn resolve_server_timestamps(doc: &mut Document, now: DateTime<Utc>) {
    let stamp = json!(now);
    for value in doc.values_mut() {
        if is_server_timestamp(value) {
            *value = stamp.clone();
        }
    }
}

/// Serialize a record into a [`Document`].
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Backend(
            "record did not serialize to a JSON object".to_string(),
        )),
        Err(e) => Err(StoreError::Backend(format!("serialize failed: {e}"))),
    }
}

/// Deserialize a [`Document`] into a record type. Unknown fields are
/// tolerated so newer documents stay readable.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| StoreError::Backend(format!("deserialize failed: {e}")))
}

/// External document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert under a generated id; returns the id.
    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Fetch one document.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or replace the document at a caller-chosen id.
    async fn put(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Merge fields into an existing document. Fails with
    /// [`StoreError::Missing`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// Backend-filtered equality query.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Every document in the collection.
    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError>;
}
