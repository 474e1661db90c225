//! `atelier doctor` — config and environment diagnostics.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use atelier_config::{collect_referenced_vars, load_config, resolve_env_vars, validate, AtelierConfig};

/// Run all checks. Returns false when any check fails.
pub async fn run(config_path: &Path) -> Result<bool> {
    println!("\n🔍 Running Atelier Doctor...\n");
    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("  🟡 not found, using defaults\n");
    }

    let raw = load_config(config_path).await?;
    let value: Value =
        serde_json::to_value(&raw).context("failed to serialize config for inspection")?;

    let env_ok = check_env_vars(&value);
    let config_ok = match resolve_env_vars(&value) {
        Ok(resolved) => {
            let config: AtelierConfig = serde_json::from_value(resolved)
                .context("failed to deserialize config after env substitution")?;
            check_validation(&config)
        }
        Err(err) => {
            println!("\n  🔴 env substitution failed: {err:#}");
            false
        }
    };

    println!();
    let is_ok = env_ok && config_ok;
    if is_ok {
        println!("✅ All checks passed! Atelier is ready to serve.");
    } else {
        println!("❌ Some checks failed! Fix the errors above before serving.");
    }

    Ok(is_ok)
}

fn check_env_vars(config_value: &Value) -> bool {
    let referenced = collect_referenced_vars(config_value);
    if referenced.is_empty() {
        println!("\nNo environment variables referenced by the config.");
        return true;
    }

    println!("\nChecking referenced environment variables:");
    let mut all_good = true;
    for var in referenced {
        match env::var(&var) {
            Ok(val) if !val.is_empty() => println!("  🟢 {var} is set"),
            _ => {
                println!("  🔴 {var} is missing");
                all_good = false;
            }
        }
    }
    all_good
}

fn check_validation(config: &AtelierConfig) -> bool {
    let report = validate(config);

    println!("\nValidating config:");
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("  🟢 no findings");
    }
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }

    report.is_valid()
}
