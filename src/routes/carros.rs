//! CRUD endpoints for the `carros` collection
//!
//! ## Endpoints
//!
//! - `GET /carros` - List all cars
//! - `GET /carros/{id}` - Get one car
//! - `POST /carros` - Create a car from the JSON body
//! - `PUT /carros/{id}` - `$set` the JSON body fields on a car
//! - `DELETE /carros/{id}` - Delete a car
//!
//! Identifiers are 24-character hex ObjectIds. Malformed identifiers and
//! bodies are rejected with 400 before the store is touched. Store failures
//! are logged and answered with a fixed 500 message.

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error as StdError;
use tracing::{debug, error, info};

use crate::db::{document_to_json, json_to_document};
use crate::db::document::DocumentError;
use crate::routes::{error_response, json_response, FullBody};
use crate::server::AppState;

const INVALID_ID: &str = "ID inválido.";
const CAR_NOT_FOUND: &str = "Carro não encontrado.";
const ITEM_NOT_FOUND: &str = "Item não encontrado.";
const NO_CREATE_DATA: &str = "Nenhum dado fornecido.";
const NO_UPDATE_DATA: &str = "Nenhum dado de atualização fornecido.";
const INVALID_JSON: &str = "JSON inválido.";
const NOT_AN_OBJECT: &str = "O corpo da requisição deve ser um objeto JSON.";
const ID_IMMUTABLE: &str = "O campo _id não pode ser alterado.";
const UNREADABLE_BODY: &str = "Corpo da requisição inválido.";
const BODY_TOO_LARGE: &str = "Corpo da requisição muito grande.";

/// Largest request body accepted, matching the 100kb default of the
/// previous deployment
pub const MAX_BODY_BYTES: usize = 100 * 1024;

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    message: &'static str,
    id: String,
}

/// Why a request body could not be turned into a set of fields
#[derive(Debug, PartialEq, Eq)]
enum BodyError {
    Unreadable,
    TooLarge,
    Empty,
    InvalidJson,
    NotAnObject,
}

impl BodyError {
    fn into_response(self, empty_message: &'static str) -> Response<FullBody> {
        let message = match self {
            BodyError::TooLarge => {
                return error_response(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE)
            }
            BodyError::Unreadable => UNREADABLE_BODY,
            BodyError::Empty => empty_message,
            BodyError::InvalidJson => INVALID_JSON,
            BodyError::NotAnObject => NOT_AN_OBJECT,
        };
        error_response(StatusCode::BAD_REQUEST, message)
    }
}

/// Percent-decode the path segment and parse it as an ObjectId
fn parse_id(id: &str) -> Option<ObjectId> {
    let decoded = urlencoding::decode(id).ok()?;
    ObjectId::parse_str(decoded.as_ref()).ok()
}

/// Collect at most `MAX_BODY_BYTES` of body and parse it as a non-empty
/// JSON object
async fn read_object<B>(req: Request<B>) -> Result<Map<String, Value>, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES);
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            debug!("Request body exceeds {} bytes", MAX_BODY_BYTES);
            return Err(BodyError::TooLarge);
        }
        Err(e) => {
            debug!("Failed to read request body: {}", e);
            return Err(BodyError::Unreadable);
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(BodyError::Empty);
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) if map.is_empty() => Err(BodyError::Empty),
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BodyError::NotAnObject),
        Err(_) => Err(BodyError::InvalidJson),
    }
}

fn document_error_message(e: &DocumentError) -> &'static str {
    match e {
        DocumentError::ExtJson(_) => INVALID_JSON,
        DocumentError::NotAnObject => NOT_AN_OBJECT,
    }
}

/// GET /carros - List all cars
pub async fn list_carros(state: &AppState) -> Response<FullBody> {
    match state.store.list().await {
        Ok(docs) => {
            let carros: Vec<Value> = docs.into_iter().map(document_to_json).collect();
            json_response(StatusCode::OK, &carros)
        }
        Err(e) => {
            error!("Error listing cars: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao buscar veículo.")
        }
    }
}

/// GET /carros/{id} - Get one car
pub async fn get_carro(state: &AppState, id: &str) -> Response<FullBody> {
    let Some(oid) = parse_id(id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    match state.store.find_by_id(oid).await {
        Ok(Some(doc)) => json_response(StatusCode::OK, &document_to_json(doc)),
        Ok(None) => error_response(StatusCode::NOT_FOUND, CAR_NOT_FOUND),
        Err(e) => {
            error!("Error fetching car {}: {}", oid, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao buscar carro.")
        }
    }
}

/// POST /carros - Create a car
///
/// The store assigns `_id`; a client-supplied `_id` is discarded.
pub async fn create_carro<B>(state: &AppState, req: Request<B>) -> Response<FullBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut fields = match read_object(req).await {
        Ok(fields) => fields,
        Err(e) => return e.into_response(NO_CREATE_DATA),
    };

    if fields.remove("_id").is_some() {
        debug!("Discarding client-supplied _id on create");
    }
    if fields.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, NO_CREATE_DATA);
    }

    let doc = match json_to_document(fields) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Rejected create body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, document_error_message(&e));
        }
    };

    match state.store.insert(doc).await {
        Ok(oid) => {
            info!("Car {} created", oid);
            json_response(
                StatusCode::CREATED,
                &CreatedResponse {
                    message: "Item criado",
                    id: oid.to_hex(),
                },
            )
        }
        Err(e) => {
            error!("Error creating car: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao criar item.")
        }
    }
}

/// PUT /carros/{id} - Merge fields into a car
///
/// Success is decided by whether a document matched, so re-sending the
/// current values still answers 200.
pub async fn update_carro<B>(state: &AppState, id: &str, req: Request<B>) -> Response<FullBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let Some(oid) = parse_id(id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    let fields = match read_object(req).await {
        Ok(fields) => fields,
        Err(e) => return e.into_response(NO_UPDATE_DATA),
    };

    if fields.contains_key("_id") {
        return error_response(StatusCode::BAD_REQUEST, ID_IMMUTABLE);
    }

    let updates = match json_to_document(fields) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Rejected update body for {}: {}", oid, e);
            return error_response(StatusCode::BAD_REQUEST, document_error_message(&e));
        }
    };

    match state.store.update_fields(oid, updates).await {
        Ok(true) => {
            info!("Car {} updated", oid);
            json_response(
                StatusCode::OK,
                &MessageResponse {
                    message: "Item atualizado com sucesso.",
                },
            )
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, CAR_NOT_FOUND),
        Err(e) => {
            error!("Error updating car {}: {}", oid, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao atualizar item.")
        }
    }
}

/// DELETE /carros/{id} - Delete a car
pub async fn delete_carro(state: &AppState, id: &str) -> Response<FullBody> {
    let Some(oid) = parse_id(id) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ID);
    };

    match state.store.delete(oid).await {
        Ok(true) => {
            info!("Car {} deleted", oid);
            json_response(
                StatusCode::OK,
                &MessageResponse {
                    message: "Item deletado com sucesso.",
                },
            )
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, ITEM_NOT_FOUND),
        Err(e) => {
            error!("Error deleting car {}: {}", oid, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao deletar item.")
        }
    }
}
