pub mod error;
pub mod movies;
pub mod system;
pub mod watchlist;

pub use error::ApiError;

use mongodb::bson::{Bson, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::Serialize;
use serde_json::Value;

/// Render a stored document as the JSON the client originally sent, with
/// top-level object ids flattened to their hex form so an identifier taken
/// from a response can be pasted straight into an `:id` path segment.
pub(crate) fn document_to_json(mut doc: Document) -> Value {
    let oid_keys: Vec<String> = doc
        .iter()
        .filter(|(_, value)| matches!(value, Bson::ObjectId(_)))
        .map(|(key, _)| key.clone())
        .collect();

    for key in oid_keys {
        if let Some(Bson::ObjectId(oid)) = doc.get(&key) {
            let hex = oid.to_hex();
            doc.insert(key, hex);
        }
    }

    Bson::Document(doc).into_relaxed_extjson()
}

pub(crate) fn documents_to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(document_to_json).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl From<InsertOneResult> for InsertOutcome {
    fn from(result: InsertOneResult) -> Self {
        let inserted_id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteOutcome {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};

    #[test]
    fn test_document_to_json_flattens_id() {
        let oid = ObjectId::parse_str("65f2a77e9d1c4b0012345678").unwrap();
        let json = document_to_json(doc! {
            "_id": oid,
            "title": "Heat",
            "rating": 8.3,
        });

        assert_eq!(json["_id"], "65f2a77e9d1c4b0012345678");
        assert_eq!(json["title"], "Heat");
        assert_eq!(json["rating"], 8.3);
    }

    #[test]
    fn test_document_to_json_passes_other_fields_through() {
        let json = document_to_json(doc! {
            "releaseYear": 1995i64,
            "createdAt": "2024-03-14T09:26:53Z",
            "tags": ["crime", "thriller"],
        });

        assert_eq!(json["releaseYear"], 1995);
        assert_eq!(json["createdAt"], "2024-03-14T09:26:53Z");
        assert_eq!(json["tags"][1], "thriller");
    }
}
