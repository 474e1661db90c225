//! Declarative persona table.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use atelier_core::AgentId;

use crate::prompts;

/// One persona: a fixed prompt plus tool bindings and display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDef {
    pub id: AgentId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub system_prompt: String,
    pub welcome: String,
    /// Tool binding names resolved against the tool registry at startup.
    #[serde(default)]
    pub tool_ids: Vec<String>,
    /// Whether the advisory scorer may suggest switching to this persona.
    #[serde(default = "default_true")]
    pub suggestible: bool,
}

fn default_true() -> bool {
    true
}

/// Immutable lookup table of personas, built once at startup.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: BTreeMap<AgentId, AgentDef>,
    default_id: AgentId,
}

/// On-disk extension format: extra personas generated offline.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    agents: Vec<AgentDef>,
}

impl AgentCatalog {
    /// The five shipped personas, with "larry" as the default.
    pub fn builtin() -> Self {
        let defs = [
            AgentDef {
                id: AgentId::from("larry"),
                name: "Larry".into(),
                icon: "🧠".into(),
                description: "General PWS thinking partner".into(),
                system_prompt: prompts::LARRY_PROMPT.into(),
                welcome: prompts::LARRY_WELCOME.into(),
                tool_ids: vec![
                    "vector_search".into(),
                    "tavily_search".into(),
                    "graph_query".into(),
                    "save_insight".into(),
                ],
                suggestible: true,
            },
            AgentDef {
                id: AgentId::from("tta"),
                name: "Trending to the Absurd".into(),
                icon: "🔮".into(),
                description: "Guided workshop: escape presentism, find future problems".into(),
                system_prompt: prompts::TTA_PROMPT.into(),
                welcome: prompts::TTA_WELCOME.into(),
                tool_ids: vec!["tavily_search".into(), "vector_search".into()],
                suggestible: true,
            },
            AgentDef {
                id: AgentId::from("jtbd"),
                name: "Jobs to Be Done".into(),
                icon: "🎯".into(),
                description: "Workshop: discover what customers really hire products for".into(),
                system_prompt: prompts::JTBD_PROMPT.into(),
                welcome: prompts::JTBD_WELCOME.into(),
                tool_ids: vec!["tavily_search".into(), "vector_search".into()],
                suggestible: true,
            },
            AgentDef {
                id: AgentId::from("scurve"),
                name: "S-Curve Analysis".into(),
                icon: "📈".into(),
                description: "Workshop: analyze technology timing and disruption".into(),
                system_prompt: prompts::SCURVE_PROMPT.into(),
                welcome: prompts::SCURVE_WELCOME.into(),
                tool_ids: vec!["tavily_search".into(), "graph_query".into()],
                suggestible: true,
            },
            AgentDef {
                id: AgentId::from("redteam"),
                name: "Red Teaming".into(),
                icon: "😈".into(),
                description: "Devil's advocate: stress-test your assumptions".into(),
                system_prompt: prompts::REDTEAM_PROMPT.into(),
                welcome: prompts::REDTEAM_WELCOME.into(),
                tool_ids: vec!["tavily_search".into()],
                suggestible: true,
            },
        ];

        let mut catalog = Self {
            agents: BTreeMap::new(),
            default_id: AgentId::from("larry"),
        };
        for def in defs {
            catalog.agents.insert(def.id.clone(), def);
        }
        catalog
    }

    /// Merge personas from a TOML document (offline-generated tables).
    /// Entries with an existing id replace the builtin definition.
    pub fn extend_from_toml(&mut self, doc: &str) -> Result<usize> {
        let file: CatalogFile = toml::from_str(doc).context("invalid agent catalog document")?;
        let count = file.agents.len();
        for def in file.agents {
            tracing::info!(agent = %def.id, "loaded persona from catalog document");
            self.agents.insert(def.id.clone(), def);
        }
        Ok(count)
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentDef> {
        self.agents.get(id)
    }

    /// Lookup that falls back to the default persona for unknown ids.
    pub fn get_or_default(&self, id: &AgentId) -> &AgentDef {
        self.agents.get(id).unwrap_or_else(|| {
            self.agents
                .get(&self.default_id)
                .expect("default persona must exist in catalog")
        })
    }

    pub fn default_agent(&self) -> &AgentDef {
        self.get_or_default(&self.default_id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    /// All personas in id order.
    pub fn all(&self) -> impl Iterator<Item = &AgentDef> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
