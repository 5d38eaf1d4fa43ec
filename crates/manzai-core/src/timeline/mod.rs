//! Timeline composition of synthesized clips
//!
//! Clips are folded left to right into a single mono buffer. Each clip's
//! `pre_phoneme_length` decides where it lands:
//! - non-negative: that many seconds of silence, then the clip (gap mode)
//! - negative: the clip starts that many seconds before the current end and
//!   is added onto the existing samples (overlap mode)
//!
//! The fold is strictly ordered; synthesis may run concurrently but the
//! results must be handed over in clip order.

mod compositor;

pub use compositor::{
    round_to, SynthesizedClip, Timeline, TimelineCompositor, TimelineEntry,
};
