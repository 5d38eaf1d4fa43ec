//! Configuration loading: optional TOML file overlaid by `MANZAI_*` env vars

use config::{Config, ConfigError, Environment, File};
use manzai_core::AppConfig;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "manzai.toml";

/// Load from `$MANZAI_CONFIG` (default `manzai.toml`) and the environment.
///
/// Nested keys use a double underscore, e.g. `MANZAI_ENGINE__BASE_URL`.
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("MANZAI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_from(Path::new(&path))
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("MANZAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
