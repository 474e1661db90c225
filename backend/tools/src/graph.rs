//! Neo4j knowledge-graph client over the HTTP transaction API.

use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use atelier_core::AtelierError;

/// Cypher keywords that mutate the graph. Read-only queries must not
/// contain any of these; mutations go through dedicated methods.
static WRITE_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(CREATE|DELETE|MERGE|SET|REMOVE|DROP)\b").unwrap()
});

const MAX_ROWS: usize = 50;
const MAX_CELL: usize = 100;

#[derive(Debug, Serialize)]
struct TxRequest {
    statements: Vec<Statement>,
}

#[derive(Debug, Serialize)]
struct Statement {
    statement: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Client for a Neo4j database reachable over HTTP.
#[derive(Clone)]
pub struct Neo4jClient {
    http: Client,
    base_url: String,
    user: String,
    password: String,
    database: String,
}

impl Neo4jClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    async fn commit(&self, statement: &str, parameters: Value) -> Result<TxResult> {
        let url = format!(
            "{}/db/{}/tx/commit",
            self.base_url.trim_end_matches('/'),
            self.database
        );
        let request = TxRequest {
            statements: vec![Statement {
                statement: statement.to_string(),
                parameters,
            }],
        };

        let mut response: TxResponse = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.errors.first() {
            anyhow::bail!("neo4j error {}: {}", err.code, err.message);
        }
        response
            .results
            .pop()
            .context("neo4j returned no result set")
    }

    /// Execute a read-only cypher query, rendered as a markdown table.
    ///
    /// Queries containing write keywords are rejected before hitting the
    /// database; mutations must use [`save_insight`](Self::save_insight).
    pub async fn query(&self, cypher: &str, params: Value) -> Result<String> {
        if WRITE_KEYWORD_RE.is_match(cypher) {
            return Err(AtelierError::WriteBlocked.into());
        }

        let result = self.commit(cypher, params).await?;
        if result.data.is_empty() {
            return Ok("Query returned no results.".into());
        }

        let mut out = vec!["## Query Results\n".to_string()];
        out.push(format!("| {} |", result.columns.join(" | ")));
        out.push(format!(
            "| {} |",
            vec!["---"; result.columns.len()].join(" | ")
        ));
        for row in result.data.iter().take(MAX_ROWS) {
            let cells: Vec<String> = row
                .row
                .iter()
                .map(|v| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    text.chars().take(MAX_CELL).collect()
                })
                .collect();
            out.push(format!("| {} |", cells.join(" | ")));
        }
        if result.data.len() > MAX_ROWS {
            out.push(format!(
                "\n*Showing {MAX_ROWS} of {} results*",
                result.data.len()
            ));
        }
        Ok(out.join("\n"))
    }

    /// Dump node labels, counts, and relationship types.
    pub async fn schema(&self) -> Result<String> {
        let mut out = vec!["## Knowledge Graph Schema\n".to_string()];

        let labels = self
            .commit(
                "CALL db.labels() YIELD label \
                 MATCH (n) WHERE label IN labels(n) \
                 RETURN label, count(n) AS count ORDER BY count DESC",
                json!({}),
            )
            .await?;
        out.push("### Node Labels".into());
        out.push("| Label | Count |".into());
        out.push("| --- | --- |".into());
        for row in &labels.data {
            if let [label, count] = row.row.as_slice() {
                out.push(format!(
                    "| {} | {} |",
                    label.as_str().unwrap_or_default(),
                    count
                ));
            }
        }

        let rels = self
            .commit(
                "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType",
                json!({}),
            )
            .await?;
        out.push("\n### Relationship Types".into());
        for row in &rels.data {
            if let Some(rel) = row.row.first().and_then(|v| v.as_str()) {
                out.push(format!("- `{rel}`"));
            }
        }

        Ok(out.join("\n"))
    }

    /// Persist an insight node. This is the sanctioned write path.
    pub async fn save_insight(
        &self,
        title: &str,
        content: &str,
        kind: &str,
        source: &str,
        tags: &[String],
    ) -> Result<String> {
        let insight_id = format!("insight-{}", Utc::now().format("%Y%m%d-%H%M%S"));
        let cypher = "CREATE (i:Insight {id: $id, title: $title, content: $content, \
                      type: $type, source: $source, tags: $tags, created_at: datetime()}) \
                      RETURN i.id AS id";
        self.commit(
            cypher,
            json!({
                "id": insight_id,
                "title": title,
                "content": content,
                "type": kind,
                "source": source,
                "tags": tags,
            }),
        )
        .await?;

        info!(id = %insight_id, title, "insight saved to knowledge graph");
        Ok(format!(
            "Insight saved.\n- **ID**: {insight_id}\n- **Title**: {title}\n- **Type**: {kind}"
        ))
    }
}
