//! Script rendering and single-line synthesis endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use manzai_core::audio::WAV_CONTENT_TYPE;
use manzai_core::{ClipSpec, ManzaiScript, ScriptMetadata};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Rendered manzai: base64 WAV plus timing metadata
#[derive(Debug, Serialize)]
pub struct ConcatResponse {
    pub audio: String,
    pub script: ScriptMetadata,
}

/// Synthesize every line of a script and stitch them into one track
pub async fn concat(
    State(state): State<AppState>,
    Json(req): Json<ManzaiScript>,
) -> Result<Json<ConcatResponse>, ApiError> {
    info!(
        "Concat request: {:?} by {:?}, {} lines",
        req.title,
        req.combi_name,
        req.voices.len()
    );

    let rendered = state.renderer.render(&req).await?;

    Ok(Json(ConcatResponse {
        audio: base64::engine::general_purpose::STANDARD.encode(&rendered.wav),
        script: rendered.metadata,
    }))
}

/// Synthesize a single line and return the engine's WAV as-is
pub async fn synthesis(
    State(state): State<AppState>,
    Json(clip): Json<ClipSpec>,
) -> Result<Response, ApiError> {
    clip.validate(0)?;
    info!(
        "Synthesis request: {} chars, speaker {}",
        clip.text.chars().count(),
        clip.speaker_id
    );

    let audio = state.synthesizer().synthesize(&clip).await?;

    Ok((
        [(header::CONTENT_TYPE, WAV_CONTENT_TYPE)],
        audio,
    )
        .into_response())
}
