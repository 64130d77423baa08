//! In-memory `CarStore`
//!
//! Keeps documents in insertion order behind a `RwLock` and counts every
//! store call, so tests can assert that rejected requests never touched the
//! store. A failing variant returns a database error from every operation.

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::db::store::CarStore;
use crate::types::{CarrosError, Result};

#[derive(Debug, Default)]
pub struct MemoryCarStore {
    docs: RwLock<Vec<Document>>,
    calls: AtomicUsize,
    fail: bool,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every operation fails with `CarrosError::Database`
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CarrosError::Database("connection reset by peer".into()));
        }
        Ok(())
    }
}

fn has_id(doc: &Document, id: &ObjectId) -> bool {
    doc.get_object_id("_id").map(|d| d == *id).unwrap_or(false)
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn list(&self) -> Result<Vec<Document>> {
        self.begin()?;
        Ok(self.docs.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>> {
        self.begin()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| has_id(d, &id)).cloned())
    }

    async fn insert(&self, doc: Document) -> Result<ObjectId> {
        self.begin()?;
        // The driver prepends a generated _id when the document has none
        let id = match doc.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => ObjectId::new(),
        };
        let mut stored = Document::new();
        stored.insert("_id", id);
        for (key, value) in doc {
            if key != "_id" {
                stored.insert(key, value);
            }
        }

        self.docs.write().await.push(stored);
        Ok(id)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool> {
        self.begin()?;
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| has_id(d, &id)) {
            Some(existing) => {
                for (key, value) in fields {
                    existing.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        self.begin()?;
        let mut docs = self.docs.write().await;
        match docs.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
