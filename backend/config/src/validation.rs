//! Config validation with field-path error messages.

use thiserror::Error;

use crate::schema::AtelierConfig;

/// A validation finding with field path and message.
#[derive(Debug, Error)]
#[error("config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all findings.
pub fn validate(config: &AtelierConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    match &config.provider {
        None => report.warn(
            "provider",
            "no LLM provider configured; persona replies will fail",
        ),
        Some(p) if p.api_key.trim().is_empty() => {
            report.error("provider.apiKey", "API key cannot be empty")
        }
        Some(p) if p.model.trim().is_empty() => {
            report.error("provider.model", "model cannot be empty")
        }
        Some(_) => {}
    }

    if let Some(tavily) = &config.tavily {
        if tavily.api_key.trim().is_empty() {
            report.error("tavily.apiKey", "API key cannot be empty");
        }
    } else {
        report.warn("tavily", "web search disabled (no Tavily section)");
    }

    if let Some(neo4j) = &config.neo4j {
        if neo4j.password.trim().is_empty() {
            report.error("neo4j.password", "password cannot be empty");
        }
        if !neo4j.url.starts_with("http://") && !neo4j.url.starts_with("https://") {
            report.error("neo4j.url", "expected an http(s) endpoint");
        }
    }

    if let Some(pinecone) = &config.pinecone {
        if pinecone.api_key.trim().is_empty() {
            report.error("pinecone.apiKey", "API key cannot be empty");
        }
        if pinecone.index_host.trim().is_empty() {
            report.error("pinecone.indexHost", "index host cannot be empty");
        }
    } else {
        report.warn("pinecone", "knowledge base disabled (no Pinecone section)");
    }

    if config.router.is_none() {
        report.warn(
            "router",
            "knowledge-graph routing disabled; suggestions fall back to keywords only",
        );
    }

    if config.gateway.port < 1024 && config.gateway.port != 80 && config.gateway.port != 443 {
        report.warn(
            "gateway.port",
            format!(
                "port {} requires elevated privileges; consider a port >= 1024",
                config.gateway.port
            ),
        );
    }

    report
}
