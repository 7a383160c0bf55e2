//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the document store.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// A document with the same id already exists.
    #[error("Document already exists: {collection}/{id}")]
    Conflict { collection: String, id: String },

    /// Failed to encode or decode a document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while persisting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unavailable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    /// Whether this error reports an id collision.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict { .. })
    }
}
