//! Async storage seam used by the task repository.

use std::error::Error as StdError;
use tasklane_core::{Document, Query, StoredDocument};
use tasklane_store::{DocumentStore, StoreError};

/// Boxed error bubbled up from a store.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Async keyed document store.
///
/// This trait mirrors [`tasklane_store::DocumentStore`] with async methods so
/// the repository can suspend while a backend round-trip is in flight.
#[allow(async_fn_in_trait)]
pub trait AsyncDocumentStore: Send + Sync {
    /// Error type bubbled up from the backing store.
    type Error: Into<BoxError> + Send;

    /// Documents of `collection` matching `query`.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, Self::Error>;

    /// Number of documents matching `query`.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    async fn count(&self, collection: &str, query: &Query) -> Result<u64, Self::Error>;

    /// Fetch one document by key.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, Self::Error>;

    /// Insert under a store-generated key.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    async fn add(&self, collection: &str, fields: Document) -> Result<String, Self::Error>;

    /// Replace (or create) the document at `key`.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    async fn set(&self, collection: &str, key: &str, fields: Document) -> Result<(), Self::Error>;

    /// Remove the document at `key`.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), Self::Error>;
}

/// Every synchronous store runs on the blocking pool.
impl<S> AsyncDocumentStore for S
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    type Error = StoreError;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, Self::Error> {
        // Clone the handle so the blocking call owns everything it touches
        let store = self.clone();
        let collection = collection.to_owned();
        let query = query.clone();
        tokio::task::spawn_blocking(move || store.query_documents(&collection, &query))
            .await
            .map_err(join_error)?
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, Self::Error> {
        let store = self.clone();
        let collection = collection.to_owned();
        let query = query.clone();
        tokio::task::spawn_blocking(move || store.count_documents(&collection, &query))
            .await
            .map_err(join_error)?
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, Self::Error> {
        let store = self.clone();
        let collection = collection.to_owned();
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || store.get_document(&collection, &key))
            .await
            .map_err(join_error)?
    }

    async fn add(&self, collection: &str, fields: Document) -> Result<String, Self::Error> {
        let store = self.clone();
        let collection = collection.to_owned();
        tokio::task::spawn_blocking(move || store.add_document(&collection, fields))
            .await
            .map_err(join_error)?
    }

    async fn set(&self, collection: &str, key: &str, fields: Document) -> Result<(), Self::Error> {
        let store = self.clone();
        let collection = collection.to_owned();
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || store.set_document(&collection, &key, fields))
            .await
            .map_err(join_error)?
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), Self::Error> {
        let store = self.clone();
        let collection = collection.to_owned();
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || store.delete_document(&collection, &key))
            .await
            .map_err(join_error)?
    }
}

fn join_error(err: tokio::task::JoinError) -> StoreError {
    StoreError::Other(format!("Task join error: {err}"))
}
