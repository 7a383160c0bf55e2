//! Durable document store for Atelier orders.
//!
//! Documents are JSON objects grouped in named collections and addressed by
//! a string id. The store supports exactly what the order lifecycle needs:
//! create, point reads, deletes, filtered scans and a conditional field
//! update that runs as a single atomic read-modify-write.
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_db::{Condition, ConditionalUpdate, DocumentStore, MemoryDb};
//! use serde_json::json;
//!
//! let db = MemoryDb::new();
//! db.insert("orders", "ord_1", doc).await?;
//!
//! // Set status to cancelled only while it is still pending.
//! let outcome = db
//!     .update_if(
//!         "orders",
//!         "ord_1",
//!         &Condition::field_in("status", [json!("pending")]),
//!         changes,
//!     )
//!     .await?;
//! ```

mod document;
mod error;
mod file;
mod memory;
mod tables;

pub use document::{
    from_document, to_document, Condition, ConditionalUpdate, Document, Filter,
};
pub use error::DbError;
pub use file::JsonFileDb;
pub use memory::MemoryDb;

use async_trait::async_trait;

/// Backend-agnostic document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with [`DbError::Conflict`] if the id is taken.
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> Result<(), DbError>;

    /// Fetch a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError>;

    /// Delete a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError>;

    /// Merge `changes` into a document only if `condition` holds for its
    /// current state. The check and the write happen under one lock.
    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        condition: &Condition,
        changes: Document,
    ) -> Result<ConditionalUpdate, DbError>;

    /// All documents matching `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DbError>;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Condition, ConditionalUpdate, DbError, Document, DocumentStore, Filter, JsonFileDb,
        MemoryDb,
    };
}
