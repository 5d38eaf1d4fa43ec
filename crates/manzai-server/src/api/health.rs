//! Engine reachability probe

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine_version: String,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let engine_version = state
        .synthesizer()
        .health()
        .await
        .map_err(|e| ApiError::unavailable(format!("Synthesis engine not responding: {}", e)))?;

    Ok(Json(HealthResponse {
        status: "ok",
        engine_version,
    }))
}
