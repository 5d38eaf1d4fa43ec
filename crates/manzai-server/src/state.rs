//! Application state management

use manzai_core::{AppConfig, ClipSynthesizer, ScriptRenderer, ScriptStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<ScriptRenderer>,
    pub store: ScriptStore,
}

impl AppState {
    pub fn new(synthesizer: Arc<dyn ClipSynthesizer>, config: &AppConfig) -> Self {
        Self {
            renderer: Arc::new(ScriptRenderer::new(synthesizer, config)),
            store: ScriptStore::new(config.storage.script_dir.clone()),
        }
    }

    pub fn synthesizer(&self) -> &dyn ClipSynthesizer {
        self.renderer.synthesizer().as_ref()
    }
}
