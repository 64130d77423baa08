//! Store abstraction used by the HTTP handlers

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

use crate::types::Result;

/// Collection name for car records
pub const CARROS_COLLECTION: &str = "carros";

/// Operations the carros routes need from a document store.
///
/// Each method maps to exactly one store operation. Implementations must be
/// safe to call concurrently from many requests.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// All documents, in store order
    async fn list(&self) -> Result<Vec<Document>>;

    /// Single document by `_id`
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>>;

    /// Insert a document and return the `_id` assigned by the store
    async fn insert(&self, doc: Document) -> Result<ObjectId>;

    /// `$set` the given fields on the document with `_id`.
    ///
    /// Returns whether a document matched, regardless of whether any value
    /// actually changed.
    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool>;

    /// Delete the document with `_id`, returning whether one was removed
    async fn delete(&self, id: ObjectId) -> Result<bool>;
}
