//! `atelier agents` — print the persona catalog and tool bindings.

use std::path::Path;

use anyhow::Result;

use atelier_config::load_and_prepare;
use atelier_tools::ToolRegistry;

pub async fn run(config_path: &Path) -> Result<()> {
    let catalog = crate::load_catalog(config_path).await?;

    // Tool bindings depend on the config; without one every binding
    // shows as unbound, which is still useful output.
    let registry = match load_and_prepare(config_path).await {
        Ok(config) => crate::build_tool_registry(&config, &reqwest::Client::new()),
        Err(_) => {
            println!("(no loadable config at {}, tools unbound)\n", config_path.display());
            ToolRegistry::new()
        }
    };

    println!("Personas ({}):\n", catalog.len());
    for persona in catalog.all() {
        println!("{} {} ({})", persona.icon, persona.name, persona.id);
        println!("   {}", persona.description);
        if persona.tool_ids.is_empty() {
            println!("   tools: none");
        } else {
            let bindings: Vec<String> = persona
                .tool_ids
                .iter()
                .map(|id| {
                    let mark = if registry.get(id).is_some() { "🟢" } else { "🟡" };
                    format!("{mark} {id}")
                })
                .collect();
            println!("   tools: {}", bindings.join("  "));
        }
        println!();
    }

    Ok(())
}
