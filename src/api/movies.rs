use axum::{
    extract::{Path, Query, State},
    Json,
};
use mongodb::bson::Document;
use serde::Deserialize;
use serde_json::Value;

use crate::db::query;
use crate::server::AppState;

use super::{document_to_json, documents_to_json, ApiError};
use super::{DeleteOutcome, InsertOutcome, UpdateOutcome};

pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let movies = state.db.list_movies(Document::new()).await?;
    Ok(Json(documents_to_json(movies)))
}

pub async fn top_rated(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let movies = state.db.top_rated().await?;
    Ok(Json(documents_to_json(movies)))
}

pub async fn latest(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let movies = state.db.latest().await?;
    Ok(Json(documents_to_json(movies)))
}

/// Single movie by id, or JSON null when nothing matches.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = query::parse_id(&id)?;
    let movie = state.db.movie_by_id(&id).await?;
    Ok(Json(movie.map(document_to_json).unwrap_or(Value::Null)))
}

/// The body is persisted as-is; the catalog is schemaless by design.
pub async fn add_movie(
    State(state): State<AppState>,
    Json(movie): Json<Document>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let result = state.db.insert_movie(movie).await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    #[serde(rename = "addedBy")]
    pub added_by: Option<String>,
}

pub async fn my_collection(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let filter = query::owner_filter("addedBy", params.added_by.as_deref());
    let movies = state.db.list_movies(filter).await?;
    Ok(Json(documents_to_json(movies)))
}

pub async fn delete_from_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = query::parse_id(&id)?;
    let result = state.db.delete_movie(&id).await?;
    Ok(Json(result.into()))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Document>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = query::parse_id(&id)?;
    let result = state.db.update_movie(&id, fields).await?;
    Ok(Json(result.into()))
}

pub async fn genres(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let genres = state.db.genres().await?;
    Ok(Json(genres))
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub genres: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
    #[serde(rename = "maxRating")]
    pub max_rating: Option<String>,
}

pub async fn filter_movies(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let (filter, sort) = query::catalog_filter(
        params.genres.as_deref(),
        params.min_rating.as_deref(),
        params.max_rating.as_deref(),
    );
    let movies = state.db.filter_movies(filter, sort).await?;
    Ok(Json(documents_to_json(movies)))
}
