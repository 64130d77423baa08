//! MongoDB client and the production car store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};
use tracing::info;

use crate::db::store::{CarStore, CARROS_COLLECTION};
use crate::types::{CarrosError, Result};

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect to MongoDB and verify the connection with a ping.
    ///
    /// Called once at startup; the caller treats any error as fatal.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB database '{}'", db_name);

        // Fail fast instead of hanging on an unreachable server
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| CarrosError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| CarrosError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Untyped handle to a collection in the configured database
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.db_name).collection(name)
    }
}

/// `CarStore` backed by the `carros` collection
#[derive(Debug, Clone)]
pub struct MongoCarStore {
    collection: Collection<Document>,
}

impl MongoCarStore {
    pub fn new(client: &MongoClient) -> Self {
        Self {
            collection: client.collection(CARROS_COLLECTION),
        }
    }
}

#[async_trait]
impl CarStore for MongoCarStore {
    async fn list(&self) -> Result<Vec<Document>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| CarrosError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CarrosError::Database(format!("Cursor read failed: {}", e)))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CarrosError::Database(format!("Find failed: {}", e)))
    }

    async fn insert(&self, doc: Document) -> Result<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .await
            .map_err(|e| CarrosError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| CarrosError::Database("Inserted _id is not an ObjectId".into()))
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map_err(|e| CarrosError::Database(format!("Update failed: {}", e)))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CarrosError::Database(format!("Delete failed: {}", e)))?;

        Ok(result.deleted_count > 0)
    }
}
