use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

use super::ApiError;

pub async fn banner() -> &'static str {
    "Movieshelf catalog API is running\n"
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Liveness plus a database round trip; a failing ping comes back as a 500
/// so the deployment platform can tell "up" from "up and connected".
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    state.db.ping().await?;

    Ok(Json(HealthStatus {
        status: "ok",
        database: "connected",
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
