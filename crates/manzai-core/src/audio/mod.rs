//! Audio encoding and decoding for synthesized clips and timelines

mod decoder;
mod encoder;

pub use decoder::decode_wav;
pub use encoder::{AudioEncoder, WAV_CONTENT_TYPE};
