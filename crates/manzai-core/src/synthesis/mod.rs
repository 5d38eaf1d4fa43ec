//! Speech synthesis collaborator and ordered gathering of clip audio

mod client;

pub use client::{patch_query, VoicevoxClient};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::script::ClipSpec;
use crate::timeline::SynthesizedClip;

/// Turns one clip spec into WAV bytes
#[async_trait]
pub trait ClipSynthesizer: Send + Sync {
    async fn synthesize(&self, clip: &ClipSpec) -> Result<Bytes>;

    /// Report the engine version, failing if it cannot be reached
    async fn health(&self) -> Result<String>;
}

/// Synthesize and decode every clip, at most `max_concurrent` at a time.
///
/// Results come back in clip order regardless of which request finishes
/// first. The first failure aborts the gather and carries its clip index.
pub async fn synthesize_all<S>(
    synthesizer: &S,
    clips: &[ClipSpec],
    max_concurrent: usize,
) -> Result<Vec<SynthesizedClip>>
where
    S: ClipSynthesizer + ?Sized,
{
    if clips.is_empty() {
        return Err(Error::EmptyInput);
    }

    stream::iter(0..clips.len())
        .map(|index| async move {
            let clip = &clips[index];
            let wav = synthesizer
                .synthesize(clip)
                .await
                .map_err(|e| e.for_clip(index))?;
            let decoded = SynthesizedClip::from_wav(&wav).map_err(|e| Error::ClipDecode {
                index,
                reason: e.to_string(),
            })?;
            debug!(
                "Clip {} decoded: {} samples at {} Hz",
                index,
                decoded.len(),
                decoded.sample_rate()
            );
            Ok::<_, Error>(decoded)
        })
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await
}
