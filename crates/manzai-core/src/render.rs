//! Script rendering: synthesize every line, compose, encode

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::Result;
use crate::script::ManzaiScript;
use crate::synthesis::{synthesize_all, ClipSynthesizer};
use crate::timeline::{Timeline, TimelineCompositor, TimelineEntry};

/// Metadata handed to the frame renderer alongside the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptMetadata {
    pub title: String,
    pub left_chara: String,
    pub right_chara: String,
    pub left_chara_path: String,
    pub right_chara_path: String,
    pub voices: Vec<TimelineEntry>,
}

/// Output of a successful render
#[derive(Debug, Clone)]
pub struct RenderedScript {
    pub wav: Vec<u8>,
    pub metadata: ScriptMetadata,
    pub duration: f64,
}

/// Renders scripts with a shared synthesizer and fixed compositor settings
pub struct ScriptRenderer {
    synthesizer: Arc<dyn ClipSynthesizer>,
    compositor: TimelineCompositor,
    max_concurrent: usize,
    export_dir: Option<PathBuf>,
}

impl ScriptRenderer {
    pub fn new(synthesizer: Arc<dyn ClipSynthesizer>, config: &AppConfig) -> Self {
        Self {
            synthesizer,
            compositor: TimelineCompositor::new(&config.compositor),
            max_concurrent: config.engine.max_concurrent_requests,
            export_dir: config.storage.export_dir.clone(),
        }
    }

    pub fn synthesizer(&self) -> &Arc<dyn ClipSynthesizer> {
        &self.synthesizer
    }

    /// Build the timeline for a script without encoding it
    pub async fn compose(&self, script: &ManzaiScript) -> Result<Timeline> {
        script.validate()?;

        let audio = synthesize_all(self.synthesizer.as_ref(), &script.voices, self.max_concurrent)
            .await?;
        let clips = script.voices.iter().cloned().zip(audio).collect();
        self.compositor.compose(clips)
    }

    pub async fn render(&self, script: &ManzaiScript) -> Result<RenderedScript> {
        let span = info_span!("render", id = %Uuid::new_v4(), title = %script.title);
        self.render_inner(script).instrument(span).await
    }

    async fn render_inner(&self, script: &ManzaiScript) -> Result<RenderedScript> {
        info!("Rendering {} lines", script.voices.len());

        let timeline = self.compose(script).await?;
        let wav = timeline.encode_wav()?;
        let duration = timeline.duration();

        if let Some(dir) = &self.export_dir {
            let path = dir.join(script.audio_file_name());
            match tokio::fs::write(&path, &wav).await {
                Ok(()) => info!("Saved audio to {:?}", path),
                Err(e) => warn!("Could not save audio to {:?}: {}", path, e),
            }
        }

        let (entries, _) = timeline.into_parts();
        info!("Rendered {:.3}s of audio", duration);

        Ok(RenderedScript {
            wav,
            metadata: ScriptMetadata {
                title: script.title.clone(),
                left_chara: script.left_chara.clone(),
                right_chara: script.right_chara.clone(),
                left_chara_path: script.left_chara_path.clone(),
                right_chara_path: script.right_chara_path.clone(),
                voices: entries,
            },
            duration,
        })
    }
}
