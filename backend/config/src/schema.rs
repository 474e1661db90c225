//! Typed configuration schema for the Atelier runtime.
//!
//! Every section is optional in the file; missing sections disable the
//! corresponding client (the runtime substitutes an inert implementation).

use serde::{Deserialize, Serialize};

/// Root configuration, loaded from `atelier.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtelierConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// LLM provider for persona replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// Tavily web search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tavily: Option<TavilyConfig>,

    /// Neo4j knowledge graph (HTTP endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neo4j: Option<Neo4jConfig>,

    /// Pinecone vector search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinecone: Option<PineconeConfig>,

    /// External knowledge-graph routing subsystem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    7777
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: String,
}

fn default_model() -> String {
    "gemini-3-flash-preview".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TavilyConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neo4jConfig {
    /// HTTP endpoint, e.g. "http://localhost:7474".
    pub url: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    pub password: String,
    #[serde(default = "default_neo4j_db")]
    pub database: String,
}

fn default_neo4j_user() -> String {
    "neo4j".into()
}

fn default_neo4j_db() -> String {
    "neo4j".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PineconeConfig {
    pub api_key: String,
    /// Data-plane host of the index to search.
    pub index_host: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Base URL of the routing subsystem, e.g. "http://graph-router:8080".
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".into()
}

fn default_log_dir() -> String {
    "logs".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: AtelierConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.gateway.port, 7777);
        assert_eq!(config.logging.level, "info");
        assert!(config.provider.is_none());
        assert!(config.router.is_none());
    }

    #[test]
    fn sections_deserialize_with_partial_fields() {
        let doc = r#"
            neo4j:
              url: http://localhost:7474
              password: secret
        "#;
        let config: AtelierConfig = serde_yaml::from_str(doc).unwrap();
        let neo4j = config.neo4j.unwrap();
        assert_eq!(neo4j.user, "neo4j");
        assert_eq!(neo4j.database, "neo4j");
    }
}
