//! WAV decoding of engine output

use std::io::Cursor;

use crate::error::{Error, Result};

/// Parse WAV bytes into mono f32 samples and their sample rate.
///
/// Integer formats are scaled into [-1.0, 1.0); float formats pass through.
pub fn decode_wav(wav_bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::new(Cursor::new(wav_bytes))
        .map_err(|e| Error::AudioError(format!("Failed to parse WAV: {}", e)))?;

    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(Error::AudioError(format!(
            "Expected mono audio, got {} channels",
            spec.channels
        )));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
    }
    .map_err(|e| Error::AudioError(format!("Corrupt WAV data: {}", e)))?;

    Ok((samples, spec.sample_rate))
}
