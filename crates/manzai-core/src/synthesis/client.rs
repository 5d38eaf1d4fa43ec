//! HTTP client for a VOICEVOX-compatible synthesis engine

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::ClipSynthesizer;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::script::ClipSpec;

/// Client for the engine's `audio_query` / `synthesis` endpoints
#[derive(Debug, Clone)]
pub struct VoicevoxClient {
    http: reqwest::Client,
    base_url: String,
}

impl VoicevoxClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the engine's default synthesis parameters for a line
    pub async fn audio_query(&self, text: &str, speaker_id: u32) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}/audio_query", self.base_url))
            .query(&[("text", text.to_string()), ("speaker", speaker_id.to_string())])
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::EngineStatus {
                endpoint: "audio_query",
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Submit a (patched) query and receive WAV bytes
    pub async fn synthesis(&self, speaker_id: u32, query: &Value) -> Result<Bytes> {
        let response = self
            .http
            .post(format!("{}/synthesis", self.base_url))
            .query(&[("speaker", speaker_id)])
            .json(query)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::EngineStatus {
                endpoint: "synthesis",
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }

    /// Engine version string, used as a health probe
    pub async fn version(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/version", self.base_url))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::EngineStatus {
                endpoint: "version",
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        // The engine answers with a JSON string literal
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }
}

/// Overwrite the voice parameters of an `audio_query` document.
///
/// Negative pre-roll is sent as 0; the overlap is applied by the compositor.
pub fn patch_query(query: &mut Value, clip: &ClipSpec) {
    let patch = json!({
        "volumeScale": clip.volume_scale,
        "speedScale": clip.speed_scale,
        "pitchScale": clip.pitch_scale,
        "intonationScale": clip.intonation_scale,
        "prePhonemeLength": clip.engine_pre_phoneme_length(),
        "postPhonemeLength": clip.post_phoneme_length,
    });

    match (query.as_object_mut(), patch) {
        (Some(fields), Value::Object(patch)) => fields.extend(patch),
        (None, patch) => *query = patch,
        _ => {}
    }
}

#[async_trait]
impl ClipSynthesizer for VoicevoxClient {
    async fn synthesize(&self, clip: &ClipSpec) -> Result<Bytes> {
        info!(
            "Synthesizing {} chars with speaker {}",
            clip.text.chars().count(),
            clip.speaker_id
        );

        let mut query = self.audio_query(&clip.text, clip.speaker_id).await?;
        patch_query(&mut query, clip);

        let audio = self.synthesis(clip.speaker_id, &query).await?;
        debug!("Engine returned {} bytes", audio.len());
        Ok(audio)
    }

    async fn health(&self) -> Result<String> {
        self.version().await
    }
}
