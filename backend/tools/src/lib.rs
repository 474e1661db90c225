//! External service clients and persona tool bindings.
//!
//! Every client is explicitly constructed and handed to its owner; there
//! are no process-wide singletons. All clients share one `reqwest::Client`.

pub mod bindings;
pub mod graph;
pub mod router_client;
pub mod tavily;
pub mod vector;

pub use bindings::{
    GraphQueryTool, GraphSchemaTool, SaveInsightTool, TavilyExtractTool, TavilySearchTool,
    ToolRegistry, VectorSearchTool,
};
pub use graph::Neo4jClient;
pub use router_client::{HttpKnowledgeRouter, NullKnowledgeRouter};
pub use tavily::TavilyClient;
pub use vector::PineconeClient;
