mod agents_cmd;
mod doctor_cmd;
mod suggest_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use atelier_agent::{GeminiProvider, TurnEngine};
use atelier_agents::AgentCatalog;
use atelier_config::{config_dir, config_file_path, load_and_prepare, AtelierConfig};
use atelier_core::KnowledgeRouter;
use atelier_gateway::{start_server, AppState};
use atelier_routing::{KeywordTable, SuggestionEngine};
use atelier_tools::{
    GraphQueryTool, GraphSchemaTool, HttpKnowledgeRouter, Neo4jClient, NullKnowledgeRouter,
    PineconeClient, SaveInsightTool, TavilyClient, TavilyExtractTool, TavilySearchTool,
    ToolRegistry, VectorSearchTool,
};
use logging::init_logger;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier — persona-routing thinking-partner platform")]
#[command(version)]
struct Cli {
    /// Path to atelier.yaml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Atelier gateway server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the persona catalog and its tool bindings
    Agents,
    /// Score a message against the keyword table (offline, no externals)
    Suggest {
        /// Message text to score
        text: String,
        /// Persona currently active (excluded from suggestions)
        #[arg(short = 'a', long, default_value = "larry")]
        current: String,
        /// Print the full scoring trace as JSON
        #[arg(long)]
        trace: bool,
    },
    /// Validate the configuration and environment
    Doctor,
}

fn resolve_config_path(cli_path: &Option<PathBuf>) -> PathBuf {
    cli_path
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(&cli.config);

    match cli.command {
        Commands::Serve { port } => {
            let mut config = load_and_prepare(&config_path)
                .await
                .with_context(|| format!("loading config from {}", config_path.display()))?;
            if let Some(port) = port {
                config.gateway.port = port;
            }
            run_server(config, &config_path).await?;
        }
        Commands::Agents => {
            agents_cmd::run(&config_path).await?;
        }
        Commands::Suggest {
            text,
            current,
            trace,
        } => {
            suggest_cmd::run(&text, &current, trace).await?;
        }
        Commands::Doctor => {
            if !doctor_cmd::run(&config_path).await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Build the tool registry from whichever config sections are present.
fn build_tool_registry(config: &AtelierConfig, http: &reqwest::Client) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    if let Some(tavily) = &config.tavily {
        let client = TavilyClient::new(http.clone(), &tavily.api_key);
        registry.register(Arc::new(TavilySearchTool(client.clone())));
        registry.register(Arc::new(TavilyExtractTool(client)));
        info!("registered Tavily tools");
    }

    if let Some(neo4j) = &config.neo4j {
        let client = Neo4jClient::new(
            http.clone(),
            &neo4j.url,
            &neo4j.user,
            &neo4j.password,
            &neo4j.database,
        );
        registry.register(Arc::new(GraphQueryTool(client.clone())));
        registry.register(Arc::new(GraphSchemaTool(client.clone())));
        registry.register(Arc::new(SaveInsightTool(client)));
        info!(url = %neo4j.url, "registered Neo4j tools");
    }

    if let Some(pinecone) = &config.pinecone {
        let client = PineconeClient::new(http.clone(), &pinecone.api_key, &pinecone.index_host);
        registry.register(Arc::new(VectorSearchTool(client)));
        info!("registered Pinecone tools");
    }

    registry
}

/// Load the built-in catalog, extended from `agents.toml` if present.
async fn load_catalog(config_path: &std::path::Path) -> Result<AgentCatalog> {
    let mut catalog = AgentCatalog::builtin();
    let extension = config_path.with_file_name("agents.toml");
    if extension.exists() {
        let doc = tokio::fs::read_to_string(&extension)
            .await
            .with_context(|| format!("reading {}", extension.display()))?;
        let added = catalog.extend_from_toml(&doc)?;
        info!(path = %extension.display(), added, "extended persona catalog");
    }
    Ok(catalog)
}

async fn run_server(config: AtelierConfig, config_path: &std::path::Path) -> Result<()> {
    init_logger(&config.logging.dir, &config.logging.level);

    let Some(provider_config) = &config.provider else {
        bail!("a provider section with an apiKey is required to serve");
    };

    let http = reqwest::Client::new();
    let registry = build_tool_registry(&config, &http);

    let catalog = Arc::new(load_catalog(config_path).await?);
    for persona in catalog.all() {
        let bound = registry.resolve(&persona.tool_ids);
        info!(agent = %persona.id, tools = bound.len(), "persona tool bindings resolved");
    }

    let router: Arc<dyn KnowledgeRouter> = match &config.router {
        Some(router_config) => {
            info!(url = %router_config.url, "using knowledge router");
            Arc::new(HttpKnowledgeRouter::new(http.clone(), &router_config.url))
        }
        None => {
            info!("no router configured, external scoring disabled");
            Arc::new(NullKnowledgeRouter)
        }
    };

    let provider = Arc::new(GeminiProvider::new(http, &provider_config.api_key));
    let suggestions = SuggestionEngine::new(Arc::new(KeywordTable::builtin()), router.clone());
    let turns = TurnEngine::new(
        catalog.clone(),
        provider,
        router,
        suggestions.clone(),
        &provider_config.model,
    );

    let state = AppState::new(catalog, turns, suggestions);
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .context("invalid gateway host/port")?;

    info!(model = %provider_config.model, "starting Atelier gateway");
    start_server(addr, state).await
}
