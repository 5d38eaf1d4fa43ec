//! Manzai Core - two-voice speech timeline composition
//!
//! This crate turns a manzai script (an ordered list of spoken lines with
//! voice parameters) into one continuous audio track plus per-line
//! start/end timestamps for caption and character animation sync.
//!
//! # Architecture
//!
//! - [`synthesis`]: VOICEVOX-compatible HTTP client and ordered, bounded
//!   concurrent gathering of clip audio
//! - [`timeline`]: the compositor fold (gap and overlap placement)
//! - [`render`]: script → WAV + metadata pipeline
//! - [`store`]: saved script documents
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use manzai_core::{AppConfig, ScriptRenderer, VoicevoxClient};
//!
//! let config = AppConfig::default();
//! let client = VoicevoxClient::new(&config.engine)?;
//! let renderer = ScriptRenderer::new(Arc::new(client), &config);
//!
//! let rendered = renderer.render(&script).await?;
//! std::fs::write("manzai.wav", &rendered.wav)?;
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod render;
pub mod script;
pub mod store;
pub mod synthesis;
pub mod timeline;

pub use config::{AppConfig, CompositorConfig, EngineConfig, ServerConfig, StorageConfig};
pub use error::{Error, Result};
pub use render::{RenderedScript, ScriptMetadata, ScriptRenderer};
pub use script::{CharacterSide, ClipSpec, ManzaiScript};
pub use store::ScriptStore;
pub use synthesis::{synthesize_all, ClipSynthesizer, VoicevoxClient};
pub use timeline::{SynthesizedClip, Timeline, TimelineCompositor, TimelineEntry};
