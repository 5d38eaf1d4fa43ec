//! Configuration types for the manzai compositor, engine client and server

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub compositor: CompositorConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Timeline compositor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositorConfig {
    /// Sample rate shared by every clip and the combined output
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Decimal digits kept in reported start/end timestamps
    #[serde(default = "default_timestamp_precision")]
    pub timestamp_precision: u32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            timestamp_precision: default_timestamp_precision(),
        }
    }
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_timestamp_precision() -> u32 {
    5
}

/// Synthesis engine (VOICEVOX-compatible) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine, without trailing slash
    #[serde(default = "default_engine_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum clips synthesized at the same time
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_engine_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_engine_url() -> String {
    "http://localhost:50021".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    4
}

/// Script and audio storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding saved script documents
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,

    /// Where rendered WAV files are also written; `None` disables export
    #[serde(default = "default_export_dir")]
    pub export_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            script_dir: default_script_dir(),
            export_dir: default_export_dir(),
        }
    }
}

fn default_script_dir() -> PathBuf {
    PathBuf::from("assets").join("manzai_scripts")
}

fn default_export_dir() -> Option<PathBuf> {
    dirs::download_dir()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_cors_enabled(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.compositor.sample_rate, 24000);
        assert_eq!(config.compositor.timestamp_precision, 5);
        assert_eq!(config.engine.base_url, "http://localhost:50021");
        assert_eq!(config.engine.timeout(), Duration::from_secs(30));
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "compositor": { "sample_rate": 48000 },
            "engine": { "base_url": "http://engine:50021" }
        }))
        .unwrap();

        assert_eq!(config.compositor.sample_rate, 48000);
        assert_eq!(config.compositor.timestamp_precision, 5);
        assert_eq!(config.engine.base_url, "http://engine:50021");
        assert_eq!(config.engine.max_concurrent_requests, 4);
        assert_eq!(config.storage.script_dir, PathBuf::from("assets/manzai_scripts"));
    }
}
