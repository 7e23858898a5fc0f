use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tasklane_core::{Document, Query, StoredDocument};
use uuid::Uuid;

/// Keyed documents of one collection, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    documents: BTreeMap<String, Document>,
}

impl Collection {
    /// Documents matching every predicate of `query`.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<StoredDocument> {
        self.documents
            .iter()
            .filter(|(_, fields)| query.matches(fields))
            .map(|(key, fields)| StoredDocument {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect()
    }

    /// Number of documents matching `query`.
    #[must_use]
    pub fn count(&self, query: &Query) -> u64 {
        let matching = self
            .documents
            .values()
            .filter(|fields| query.matches(fields))
            .count();
        u64::try_from(matching).unwrap_or(u64::MAX)
    }

    /// Document stored at `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredDocument> {
        self.documents.get(key).map(|fields| StoredDocument {
            key: key.to_owned(),
            fields: fields.clone(),
        })
    }

    /// Insert under a freshly generated key and return it.
    pub fn add(&mut self, fields: Document) -> String {
        let key = generate_key();
        self.documents.insert(key.clone(), fields);
        key
    }

    /// Replace (or create) the document at `key`.
    pub fn set(&mut self, key: &str, fields: Document) {
        self.documents.insert(key.to_owned(), fields);
    }

    /// Remove the document at `key`, reporting whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.documents.remove(key).is_some()
    }
}

/// UUID v7 keys sort by creation time.
fn generate_key() -> String {
    Uuid::now_v7().simple().to_string()
}
