//! Saved script documents, one JSON file per script

use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::Result;

/// Directory-backed store of script documents
#[derive(Debug, Clone)]
pub struct ScriptStore {
    dir: PathBuf,
}

impl ScriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a script: `{title}_{combi_name}.json` with `/` made safe.
    pub fn file_name_for(script: &Value) -> String {
        let field = |name: &str, fallback: &str| {
            script
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .replace('/', "_")
        };
        format!(
            "{}_{}.json",
            field("title", "untitled"),
            field("combi_name", "unknown")
        )
    }

    /// Write the document, replacing any script with the same name.
    pub async fn save(&self, script: &Value) -> Result<String> {
        fs::create_dir_all(&self.dir).await?;

        let filename = Self::file_name_for(script);
        let contents = serde_json::to_vec_pretty(script)?;
        fs::write(self.dir.join(&filename), contents).await?;

        debug!("Saved script {:?} in {:?}", filename, self.dir);
        Ok(filename)
    }

    /// Load every `*.json` document; unreadable files are skipped.
    pub async fn list(&self) -> Result<Vec<Value>> {
        if !fs::try_exists(&self.dir).await? {
            fs::create_dir_all(&self.dir).await?;
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut scripts = Vec::with_capacity(paths.len());
        for path in paths {
            match read_document(&path).await {
                Ok(script) => scripts.push(script),
                Err(e) => warn!("Skipping {:?}: {}", path, e),
            }
        }
        Ok(scripts)
    }
}

async fn read_document(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
