//! Script documents: the clip specs a manzai is made of

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

const VOLUME_RANGE: RangeInclusive<f64> = 0.5..=10.0;
const SPEED_RANGE: RangeInclusive<f64> = 0.5..=2.0;
const PITCH_RANGE: RangeInclusive<f64> = -0.15..=0.15;
const INTONATION_RANGE: RangeInclusive<f64> = 0.0..=3.0;
pub(crate) const PRE_PHONEME_RANGE: RangeInclusive<f64> = -5.0..=10.0;
const POST_PHONEME_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// Which of the two performers speaks a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSide {
    Left,
    Right,
}

/// One spoken line and the voice parameters used to synthesize it.
///
/// `pre_phoneme_length` doubles as the timeline directive: a non-negative
/// value inserts that much silence before the line, a negative value starts
/// the line that many seconds before the end of the audio so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub text: String,

    pub speaker_id: u32,

    #[serde(default = "default_volume_scale")]
    pub volume_scale: f64,

    #[serde(default = "default_speed_scale")]
    pub speed_scale: f64,

    #[serde(default)]
    pub pitch_scale: f64,

    #[serde(default)]
    pub intonation_scale: f64,

    #[serde(default = "default_pre_phoneme_length")]
    pub pre_phoneme_length: f64,

    #[serde(default)]
    pub post_phoneme_length: f64,

    #[serde(
        rename = "characterType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub character_type: Option<CharacterSide>,
}

fn default_volume_scale() -> f64 {
    2.0
}

fn default_speed_scale() -> f64 {
    1.0
}

fn default_pre_phoneme_length() -> f64 {
    0.1
}

impl ClipSpec {
    pub fn new(text: impl Into<String>, speaker_id: u32) -> Self {
        Self {
            text: text.into(),
            speaker_id,
            volume_scale: default_volume_scale(),
            speed_scale: default_speed_scale(),
            pitch_scale: 0.0,
            intonation_scale: 0.0,
            pre_phoneme_length: default_pre_phoneme_length(),
            post_phoneme_length: 0.0,
            character_type: None,
        }
    }

    pub fn with_pre_phoneme_length(mut self, seconds: f64) -> Self {
        self.pre_phoneme_length = seconds;
        self
    }

    /// Whether this clip mixes into the tail of the previous audio
    pub fn overlaps_previous(&self) -> bool {
        self.pre_phoneme_length < 0.0
    }

    /// Leading silence the engine may insert; it has no notion of negative silence.
    pub fn engine_pre_phoneme_length(&self) -> f64 {
        self.pre_phoneme_length.max(0.0)
    }

    /// Check text and every scale against its accepted range.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::InvalidClip {
                index,
                reason: "text cannot be empty or only whitespace".to_string(),
            });
        }

        let fields = [
            ("volume_scale", self.volume_scale, VOLUME_RANGE),
            ("speed_scale", self.speed_scale, SPEED_RANGE),
            ("pitch_scale", self.pitch_scale, PITCH_RANGE),
            ("intonation_scale", self.intonation_scale, INTONATION_RANGE),
            ("pre_phoneme_length", self.pre_phoneme_length, PRE_PHONEME_RANGE),
            ("post_phoneme_length", self.post_phoneme_length, POST_PHONEME_RANGE),
        ];

        for (name, value, range) in fields {
            if !range.contains(&value) {
                return Err(Error::InvalidClip {
                    index,
                    reason: format!(
                        "{} = {} is outside [{}, {}]",
                        name,
                        value,
                        range.start(),
                        range.end()
                    ),
                });
            }
        }

        Ok(())
    }
}

/// A full two-performer script as submitted for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManzaiScript {
    pub title: String,
    pub combi_name: String,
    pub left_chara: String,
    pub right_chara: String,
    pub left_chara_path: String,
    pub right_chara_path: String,
    pub voices: Vec<ClipSpec>,
}

impl ManzaiScript {
    /// Validate every clip, reporting the first offending index.
    pub fn validate(&self) -> Result<()> {
        if self.voices.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.voices
            .iter()
            .enumerate()
            .try_for_each(|(index, clip)| clip.validate(index))
    }

    /// File name used when the rendered audio is exported.
    pub fn audio_file_name(&self) -> String {
        format!("{}_{}.wav", self.combi_name, self.title).replace('/', "_")
    }
}
