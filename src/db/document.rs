//! JSON <-> BSON conversion for car documents
//!
//! Request bodies follow MongoDB extended JSON rules, so `{"$oid": ...}` or
//! `{"$date": ...}` values become native BSON types. Responses use relaxed
//! extended JSON, except ObjectIds are written as plain hex strings.

use bson::{Bson, Document};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors converting a JSON body into a BSON document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid extended JSON: {0}")]
    ExtJson(String),

    #[error("value is not a JSON object")]
    NotAnObject,
}

/// Convert a JSON object into a BSON document
pub fn json_to_document(map: Map<String, Value>) -> Result<Document, DocumentError> {
    match Bson::try_from(Value::Object(map)) {
        Ok(Bson::Document(doc)) => Ok(doc),
        // e.g. a top-level `{"$oid": "..."}` collapses into a scalar
        Ok(_) => Err(DocumentError::NotAnObject),
        Err(e) => Err(DocumentError::ExtJson(e.to_string())),
    }
}

/// Convert a stored document into the JSON returned to clients
pub fn document_to_json(doc: Document) -> Value {
    Value::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
