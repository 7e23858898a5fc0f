//! Keyed document stores for tasklane.
//!
//! Stores hold named collections of [`Document`]s and evaluate
//! [`Query`] predicates the same way a hosted document database would.

mod collection;
pub mod error;
mod file;
mod lock;
mod memory;

pub use collection::Collection;
pub use error::StoreError;
pub use file::{FileStore, STORE_SCHEMA_VERSION};
pub use memory::MemoryStore;

use tasklane_core::{Document, Query, StoredDocument};

/// Minimal keyed document store abstraction.
pub trait DocumentStore {
    /// Documents of `collection` matching `query`, in store order.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn query_documents(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError>;

    /// Number of documents matching `query`.
    ///
    /// The default implementation counts the result of
    /// [`query_documents`](Self::query_documents).
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn count_documents(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        let documents = self.query_documents(collection, query)?;
        Ok(u64::try_from(documents.len()).unwrap_or(u64::MAX))
    }

    /// Fetch a single document by key.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn get_document(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Insert a document under a store-generated key.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn add_document(&self, collection: &str, fields: Document) -> Result<String, StoreError>;

    /// Replace the document at `key`, creating it when absent.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn set_document(&self, collection: &str, key: &str, fields: Document) -> Result<(), StoreError>;

    /// Remove the document at `key`. Missing keys are not an error.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}
