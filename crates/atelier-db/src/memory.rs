//! In-process document store.

use crate::tables::Tables;
use crate::{Condition, ConditionalUpdate, DbError, Document, DocumentStore, Filter};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Volatile store for tests and single-process demos.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDb {
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), DbError> {
        self.tables.lock().await.insert(collection, id, doc)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
        Ok(self.tables.lock().await.get(collection, id))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError> {
        Ok(self.tables.lock().await.delete(collection, id))
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        condition: &Condition,
        changes: Document,
    ) -> Result<ConditionalUpdate, DbError> {
        Ok(self
            .tables
            .lock()
            .await
            .update_if(collection, id, condition, changes))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DbError> {
        Ok(self.tables.lock().await.find(collection, filter))
    }
}
