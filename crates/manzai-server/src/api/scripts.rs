//! Saved script endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn save(
    State(state): State<AppState>,
    Json(script): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let filename = state.store.save(&script).await?;
    Ok(Json(json!({
        "message": "Script saved successfully",
        "filename": filename,
    })))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.list().await?))
}
