//! Database layer for the carros collection
//!
//! - `mongo`: MongoDB connection bootstrap and the production store
//! - `memory`: in-process store used by tests
//! - `document`: JSON <-> BSON conversion for schema-less car documents

pub mod document;
pub mod memory;
pub mod mongo;
pub mod store;

pub use document::{document_to_json, json_to_document};
pub use memory::MemoryCarStore;
pub use mongo::{MongoCarStore, MongoClient};
pub use store::{CarStore, CARROS_COLLECTION};
