//! Audio encoding of the combined timeline buffer

use hound::{WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use crate::error::{Error, Result};

/// MIME type of everything [`AudioEncoder`] produces
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Audio encoder for converting f32 samples to 16-bit PCM WAV
pub struct AudioEncoder {
    sample_rate: u32,
    channels: u16,
}

impl AudioEncoder {
    /// Create a mono encoder at the given rate
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }

    /// Encode samples as a WAV file
    pub fn encode(&self, samples: &[f32]) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer =
                WavWriter::new(&mut buffer, spec).map_err(|e| Error::AudioError(e.to_string()))?;

            for &sample in samples {
                // Mixed regions may exceed full scale; only the encoded copy is clamped
                let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer
                    .write_sample(sample_i16)
                    .map_err(|e| Error::AudioError(e.to_string()))?;
            }

            writer
                .finalize()
                .map_err(|e| Error::AudioError(e.to_string()))?;
        }

        debug!(
            "Encoded {} samples to WAV ({} bytes)",
            samples.len(),
            buffer.get_ref().len()
        );
        Ok(buffer.into_inner())
    }
}
