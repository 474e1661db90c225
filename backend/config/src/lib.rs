//! `atelier-config` — runtime configuration management.
//!
//! Provides:
//! - Typed config schema for every external collaborator
//! - YAML loading with `${ENV_VAR}` substitution
//! - Validation with field-path errors and warnings

pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{collect_referenced_vars, resolve_env_vars, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::AtelierConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Load, substitute env vars, and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<AtelierConfig> {
    let raw = load_config(path).await?;

    let mut value: Value =
        serde_json::to_value(&raw).context("failed to serialize config for processing")?;
    value = resolve_env_vars(&value).context("failed to resolve env vars in config")?;

    let config: AtelierConfig =
        serde_json::from_value(value).context("failed to deserialize config after processing")?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "config error");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pipeline_substitutes_env_vars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.yaml");
        tokio::fs::write(&path, "tavily:\n  apiKey: ${ATELIER_TEST_TAVILY_KEY}\n")
            .await
            .unwrap();
        std::env::set_var("ATELIER_TEST_TAVILY_KEY", "tvly-xyz");

        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.tavily.unwrap().api_key, "tvly-xyz");
    }
}
