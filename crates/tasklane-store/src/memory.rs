use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tasklane_core::{Document, Query, StoredDocument};
use tracing::{debug, info};

use crate::collection::Collection;
use crate::{DocumentStore, StoreError};

type Collections = BTreeMap<String, Collection>;

/// In-process store. Clones share the same data.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl DocumentStore for MemoryStore {
    fn query_documents(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let guard = self.read()?;
        let found = guard
            .get(collection)
            .map_or_else(Vec::new, |docs| docs.query(query));
        drop(guard);
        debug!(collection, filters = query.filters.len(), matched = found.len(), "Queried documents");
        Ok(found)
    }

    fn count_documents(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        let guard = self.read()?;
        Ok(guard.get(collection).map_or(0, |docs| docs.count(query)))
    }

    fn get_document(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let guard = self.read()?;
        Ok(guard.get(collection).and_then(|docs| docs.get(key)))
    }

    fn add_document(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        let mut guard = self.write()?;
        let key = guard.entry(collection.to_owned()).or_default().add(fields);
        drop(guard);
        info!(collection, %key, "Added document");
        Ok(key)
    }

    fn set_document(&self, collection: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        guard.entry(collection.to_owned()).or_default().set(key, fields);
        drop(guard);
        info!(collection, key, "Set document");
        Ok(())
    }

    fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut guard = self.write()?;
        let existed = guard
            .get_mut(collection)
            .is_some_and(|docs| docs.delete(key));
        drop(guard);
        info!(collection, key, existed, "Deleted document");
        Ok(())
    }
}
