//! Document store
//!
//! Persistence is a hierarchical document store addressed by slash-separated paths such as
//! `orders/{uuid}` or `carts/{user}/items/{uuid}`. A collection is every document whose path
//! is the collection path plus one more segment. Documents are JSON objects.

use async_trait::async_trait;
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;

pub use memory::MemoryDocumentStore;

/// A stored document.
pub type Document = Map<String, Value>;

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document already exists: {0}")]
    AlreadyExists(String),

    #[error("precondition failed for {path}: expected {field} to be {expected}")]
    Conflict {
        path: String,
        field: String,
        expected: Value,
    },

    #[error("failed to encode document")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode document {path}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Guard on a field of the stored document, checked atomically with a write.
#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub field: String,
    pub expected: Value,
}

impl Precondition {
    pub fn field_equals(field: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn holds_for(&self, document: &Document) -> bool {
        document.get(&self.field).unwrap_or(&Value::Null) == &self.expected
    }
}

#[automock]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document.
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError>;

    /// List the documents of a collection as `(id, document)` pairs, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError>;

    /// Create a document, failing if the path is taken.
    async fn create(&self, path: &str, document: Document) -> Result<(), StoreError>;

    /// Create or overwrite a document.
    async fn set(&self, path: &str, document: Document) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document is missing and with
    /// [`StoreError::Conflict`] when `precondition` does not hold.
    async fn update(
        &self,
        path: &str,
        fields: Document,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError>;

    /// Remove a document, failing if it is missing.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Serialize a value into a document.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] when the value does not serialize to a JSON object.
pub fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value).map_err(StoreError::Encode)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::Encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

/// Deserialize the document stored at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] when the document does not match `T`.
pub fn decode<T: DeserializeOwned>(path: &str, document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document)).map_err(|source| StoreError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Build a document from field/value pairs.
pub fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Document {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}
