//! Config file reading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::AtelierConfig;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "atelier.yaml";

/// Resolve the Atelier config directory.
/// Priority: `ATELIER_CONFIG_DIR` env > `~/.atelier/` > `./`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ATELIER_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".atelier");
    }
    PathBuf::from(".")
}

/// Full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns defaults if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<AtelierConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file does not exist; using defaults");
        return Ok(AtelierConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: AtelierConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/atelier.yaml"))
            .await
            .unwrap();
        assert_eq!(config.gateway.port, 7777);
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.yaml");
        tokio::fs::write(&path, "gateway:\n  port: 9000\n")
            .await
            .unwrap();
        let config = load_config(&path).await.unwrap();
        assert_eq!(config.gateway.port, 9000);
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.yaml");
        tokio::fs::write(&path, "gateway: [").await.unwrap();
        assert!(load_config(&path).await.is_err());
    }
}
