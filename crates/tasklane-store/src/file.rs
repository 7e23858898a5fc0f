use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tasklane_core::{Document, Query, StoredDocument};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::collection::Collection;
use crate::lock::{LockMode, StoreLockGuard};
use crate::{DocumentStore, StoreError};

/// Format revision written into every store file.
pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredCollections {
    schema_version: u32,
    #[serde(default)]
    collections: BTreeMap<String, Collection>,
}

/// Store persisted as a single JSON file.
///
/// Every call reloads the file, so separate processes observe each other's
/// writes. Each write holds an exclusive lock on `<path>.lock` for the whole
/// load-apply-persist cycle and replaces the file atomically.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredCollections, StoreError> {
        if !self.path.exists() {
            return self.load();
        }
        let _lock = StoreLockGuard::acquire(&self.path, LockMode::Read)?;
        self.load()
    }

    fn load(&self) -> Result<StoredCollections, StoreError> {
        if !self.path.exists() {
            return Ok(StoredCollections {
                schema_version: STORE_SCHEMA_VERSION,
                collections: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredCollections =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        if stored.schema_version != STORE_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: stored.schema_version,
                expected: STORE_SCHEMA_VERSION,
            });
        }
        Ok(stored)
    }

    fn save(&self, stored: &StoredCollections) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(stored).map_err(StoreError::Serialize)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(tmp.path(), permissions)?;
        }

        tmp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut StoredCollections) -> T) -> Result<T, StoreError> {
        let _lock = StoreLockGuard::acquire(&self.path, LockMode::Write)?;
        let mut stored = self.load()?;
        let result = apply(&mut stored);
        self.save(&stored)?;
        Ok(result)
    }
}

impl DocumentStore for FileStore {
    fn query_documents(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let stored = self.read()?;
        let found = stored
            .collections
            .get(collection)
            .map_or_else(Vec::new, |docs| docs.query(query));
        debug!(path = %self.path.display(), collection, matched = found.len(), "Queried documents");
        Ok(found)
    }

    fn count_documents(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        let stored = self.read()?;
        Ok(stored
            .collections
            .get(collection)
            .map_or(0, |docs| docs.count(query)))
    }

    fn get_document(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let stored = self.read()?;
        Ok(stored.collections.get(collection).and_then(|docs| docs.get(key)))
    }

    fn add_document(&self, collection: &str, fields: Document) -> Result<String, StoreError> {
        let key = self.mutate(|stored| {
            stored
                .collections
                .entry(collection.to_owned())
                .or_default()
                .add(fields)
        })?;
        info!(path = %self.path.display(), collection, %key, "Added document");
        Ok(key)
    }

    fn set_document(&self, collection: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        self.mutate(|stored| {
            stored
                .collections
                .entry(collection.to_owned())
                .or_default()
                .set(key, fields);
        })?;
        info!(path = %self.path.display(), collection, key, "Set document");
        Ok(())
    }

    fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let existed = self.mutate(|stored| {
            stored
                .collections
                .get_mut(collection)
                .is_some_and(|docs| docs.delete(key))
        })?;
        info!(path = %self.path.display(), collection, key, existed, "Deleted document");
        Ok(())
    }
}
