//! In-memory document store.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Precondition, StoreError};

/// Document store held in process memory. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().await.get(path).cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError> {
        let prefix = format!("{}/", collection.trim_end_matches('/'));
        let documents = self.documents.read().await;

        Ok(documents
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, document)| {
                let id = path.strip_prefix(&prefix)?;

                (!id.contains('/')).then(|| (id.to_string(), document.clone()))
            })
            .collect())
    }

    async fn create(&self, path: &str, document: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;

        if documents.contains_key(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }

        documents.insert(path.to_string(), document);

        Ok(())
    }

    async fn set(&self, path: &str, document: Document) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert(path.to_string(), document);

        Ok(())
    }

    async fn update(
        &self,
        path: &str,
        fields: Document,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;

        let document = documents
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        if let Some(precondition) = precondition
            && !precondition.holds_for(document)
        {
            return Err(StoreError::Conflict {
                path: path.to_string(),
                field: precondition.field,
                expected: precondition.expected,
            });
        }

        document.extend(fields);

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}
