//! Left-to-right fold of synthesized clips into one timeline

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::audio::{decode_wav, AudioEncoder};
use crate::config::CompositorConfig;
use crate::error::{Error, Result};
use crate::script::{ClipSpec, PRE_PHONEME_RANGE};

/// Round `value` to `digits` decimal places.
///
/// Goes through the exact decimal formatter, so ties are decided by the
/// binary value actually stored rather than by a scaled intermediate.
pub fn round_to(value: f64, digits: u32) -> f64 {
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Mono PCM produced by the synthesis engine for one clip
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SynthesizedClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decode engine WAV output
    pub fn from_wav(wav_bytes: &[u8]) -> Result<Self> {
        let (samples, sample_rate) = decode_wav(wav_bytes)?;
        Ok(Self::new(samples, sample_rate))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds, from the sample count
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Where a clip landed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub index: usize,

    #[serde(flatten)]
    pub clip: ClipSpec,

    /// Seconds from the start of the timeline, rounded
    pub start: f64,

    /// Seconds from the start of the timeline, rounded
    pub end: f64,

    /// The requested overlap reached past the start of the timeline
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub overlap_clamped: bool,
}

impl TimelineEntry {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, seconds: f64) -> bool {
        self.start <= seconds && seconds <= self.end
    }
}

/// Combined audio plus per-clip timing, built once per composition
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Timeline {
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of the combined buffer in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// First entry being spoken at `seconds`, as a frame renderer would query it.
    pub fn entry_at(&self, seconds: f64) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| entry.contains(seconds))
    }

    /// Encode the combined buffer as mono 16-bit WAV
    pub fn encode_wav(&self) -> Result<Vec<u8>> {
        AudioEncoder::mono(self.sample_rate).encode(&self.samples)
    }

    pub fn into_parts(self) -> (Vec<TimelineEntry>, Vec<f32>) {
        (self.entries, self.samples)
    }
}

/// Folds (spec, audio) pairs into a [`Timeline`].
///
/// Holds configuration only; every call to [`compose`](Self::compose) owns
/// its own buffer.
#[derive(Debug, Clone)]
pub struct TimelineCompositor {
    sample_rate: u32,
    precision: u32,
}

impl TimelineCompositor {
    pub fn new(config: &CompositorConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            precision: config.timestamp_precision,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn compose(&self, clips: Vec<(ClipSpec, SynthesizedClip)>) -> Result<Timeline> {
        if clips.is_empty() {
            return Err(Error::EmptyInput);
        }
        for (index, (spec, clip)) in clips.iter().enumerate() {
            if index > 0 {
                check_pre_roll(index, spec)?;
            }
            self.check_clip(index, clip)?;
        }

        let total: usize = clips.iter().map(|(_, clip)| clip.len()).sum();
        let mut buffer: Vec<f32> = Vec::with_capacity(total);
        let mut entries = Vec::with_capacity(clips.len());

        for (index, (spec, clip)) in clips.into_iter().enumerate() {
            let entry = if index == 0 {
                buffer.extend_from_slice(clip.samples());
                self.entry(index, spec, 0, &clip, false)
            } else if spec.overlaps_previous() {
                let overlap = self.to_samples(-spec.pre_phoneme_length);
                let history = buffer.len();
                let (start, clamped) = mix_into_tail(&mut buffer, overlap, clip.samples());
                if clamped {
                    warn!(
                        "Clip {} asks for {} samples of overlap but only {} exist; starting at 0",
                        index, overlap, history
                    );
                }
                self.entry(index, spec, start, &clip, clamped)
            } else {
                let silence = self.to_samples(spec.pre_phoneme_length);
                let start = buffer.len() + silence;
                buffer.resize(start, 0.0);
                buffer.extend_from_slice(clip.samples());
                self.entry(index, spec, start, &clip, false)
            };

            debug!(
                "Clip {} placed at {}~{} (cursor {:.5}s)",
                index,
                entry.start,
                entry.end,
                buffer.len() as f64 / self.sample_rate as f64
            );
            entries.push(entry);
        }

        Ok(Timeline {
            entries,
            samples: buffer,
            sample_rate: self.sample_rate,
        })
    }

    fn check_clip(&self, index: usize, clip: &SynthesizedClip) -> Result<()> {
        if clip.is_empty() {
            return Err(Error::ClipDecode {
                index,
                reason: "clip has no samples".to_string(),
            });
        }
        if clip.sample_rate() != self.sample_rate {
            return Err(Error::ClipDecode {
                index,
                reason: format!(
                    "sample rate {} Hz does not match timeline rate {} Hz",
                    clip.sample_rate(),
                    self.sample_rate
                ),
            });
        }
        Ok(())
    }

    fn to_samples(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64).round() as usize
    }

    fn entry(
        &self,
        index: usize,
        clip: ClipSpec,
        start_sample: usize,
        audio: &SynthesizedClip,
        overlap_clamped: bool,
    ) -> TimelineEntry {
        let start = start_sample as f64 / self.sample_rate as f64;
        TimelineEntry {
            index,
            clip,
            start: round_to(start, self.precision),
            end: round_to(start + audio.duration(), self.precision),
            overlap_clamped,
        }
    }
}

/// Placement directives outside the accepted range would overflow the buffer arithmetic
fn check_pre_roll(index: usize, spec: &ClipSpec) -> Result<()> {
    if PRE_PHONEME_RANGE.contains(&spec.pre_phoneme_length) {
        return Ok(());
    }
    Err(Error::InvalidClip {
        index,
        reason: format!(
            "pre_phoneme_length = {} is outside [{}, {}]",
            spec.pre_phoneme_length,
            PRE_PHONEME_RANGE.start(),
            PRE_PHONEME_RANGE.end()
        ),
    })
}

/// Add `samples` onto `buffer` starting `overlap` samples before its end.
///
/// Samples before the mix point are left untouched; the buffer grows only if
/// the clip runs past the current end. Returns the start sample and whether
/// the overlap had to be clamped to the beginning of the buffer.
fn mix_into_tail(buffer: &mut Vec<f32>, overlap: usize, samples: &[f32]) -> (usize, bool) {
    let clamped = overlap > buffer.len();
    let start = buffer.len().saturating_sub(overlap);
    let end = start + samples.len();
    if end > buffer.len() {
        buffer.resize(end, 0.0);
    }
    for (mixed, &sample) in buffer[start..end].iter_mut().zip(samples) {
        *mixed += sample;
    }
    (start, clamped)
}
