use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{BookingServerError, Result};

pub const SERVICES_COLLECTION: &str = "services";
pub const BOOKINGS_COLLECTION: &str = "booking";

/// Field bookings are queried by.
pub const BOOKING_EMAIL_FIELD: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: ObjectId) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Path identifiers are only converted, never validated up front: a bad one
/// is reported the same way as any other store failure.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|e| BookingServerError::InvalidIdentifier(format!("'{id}': {e}")))
}

/// Converts a request body into a storable document. Extended JSON
/// (`{"$date": ...}`) is honoured and any client-supplied `_id` is dropped.
pub fn document_from_json(payload: Map<String, Value>) -> Result<Document> {
    let mut document = Document::try_from(payload)
        .map_err(|e| BookingServerError::InvalidDocument(e.to_string()))?;
    document.remove("_id");
    Ok(document)
}

pub fn document_to_json(mut document: Document) -> Value {
    let id = document.remove("_id");
    let mut value = Bson::Document(document).into_relaxed_extjson();

    if let (Some(id), Value::Object(map)) = (id, &mut value) {
        map.insert("_id".to_string(), id_to_json(id));
    }

    value
}

pub fn documents_to_json(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(document_to_json).collect()
}

fn id_to_json(id: Bson) -> Value {
    match id {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

/// Exact equality on every filter field; no partial or case-folded matching.
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}
