//! `${VAR}` environment substitution over a config value tree.
//!
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are matched, and only in
//! string leaves. A referenced variable that is unset or empty is an
//! error naming the config path where it was found.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute using a provided map (used by tests).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                error.get_or_insert(MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Collect every env var name referenced in a config tree (diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                out.push(caps[1].to_string());
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_recursive(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"apiKey": "${TAVILY_API_KEY}"});
        let result = resolve_env_vars_with(&v, &env(&[("TAVILY_API_KEY", "tvly-abc")])).unwrap();
        assert_eq!(result["apiKey"], "tvly-abc");
    }

    #[test]
    fn error_names_var_and_path() {
        let v = json!({"neo4j": {"password": "${NEO4J_PASSWORD}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NEO4J_PASSWORD"));
        assert!(msg.contains("neo4j.password"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let v = json!({"key": "${EMPTY_VAR}"});
        assert!(resolve_env_vars_with(&v, &env(&[("EMPTY_VAR", "")])).is_err());
    }

    #[test]
    fn lowercase_names_are_not_substituted() {
        let v = json!({"key": "${not_a_var}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["key"], "${not_a_var}");
    }

    #[test]
    fn substitutes_inside_arrays() {
        let v = json!({"hosts": ["${HOST_A}", "plain"]});
        let result = resolve_env_vars_with(&v, &env(&[("HOST_A", "a.example")])).unwrap();
        assert_eq!(result["hosts"][0], "a.example");
        assert_eq!(result["hosts"][1], "plain");
    }

    #[test]
    fn collects_referenced_vars_sorted() {
        let v = json!({"a": "${FOO}", "b": {"c": "${BAR} and ${FOO}"}});
        assert_eq!(collect_referenced_vars(&v), vec!["BAR", "FOO"]);
    }
}
