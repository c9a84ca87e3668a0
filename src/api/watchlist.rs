use axum::{
    extract::{Path, Query, State},
    Json,
};
use mongodb::bson::Document;
use serde::Deserialize;
use serde_json::Value;

use crate::db::query;
use crate::server::AppState;

use super::{documents_to_json, ApiError, DeleteOutcome, InsertOutcome};

/// Watchlist entries carry whatever movie reference the client chooses to
/// store; only the owning email is interpreted server-side.
pub async fn add_entry(
    State(state): State<AppState>,
    Json(entry): Json<Document>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let result = state.db.insert_watchlist_entry(entry).await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let filter = query::owner_filter("email", params.email.as_deref());
    let entries = state.db.watchlist_entries(filter).await?;
    Ok(Json(documents_to_json(entries)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = query::parse_id(&id)?;
    let result = state.db.delete_watchlist_entry(&id).await?;
    Ok(Json(result.into()))
}
