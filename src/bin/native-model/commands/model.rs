//! `native-model model` command

use anyhow::Result;

use native_model::core::axis::Named;
use native_model::ops::resolve_model;
use native_model::util::diagnostic::{self, suggestions, Diagnostic};
use native_model::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    if ctx.find_manifest().is_none() {
        diagnostic::emit(
            &Diagnostic::note("no Model.toml found; showing defaults")
                .with_suggestion(suggestions::NO_MANIFEST),
            ctx.color(),
        );
    }

    let mut model = resolve_model(ctx)?;

    println!("Tool chains:");
    for tool_chain in model.tool_chains()?.iter() {
        let targets = if tool_chain.targets().is_empty() {
            "host".to_string()
        } else {
            tool_chain
                .targets()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  {} ({}) -> {}", tool_chain.name(), tool_chain.family(), targets);
    }

    println!("Platforms:");
    for platform in model.platforms()?.iter() {
        println!("  {}", platform);
    }

    println!(
        "Build types: {}",
        model.build_types()?.names().collect::<Vec<_>>().join(", ")
    );
    println!(
        "Flavors: {}",
        model.flavors()?.names().collect::<Vec<_>>().join(", ")
    );

    let repositories = model.repositories()?;
    if !repositories.is_empty() {
        println!("Repositories:");
        for repository in repositories.iter() {
            println!("  {} ({})", repository.name(), repository.kind());
        }
    }

    println!("Binaries: {}", model.binaries()?.len()?);

    Ok(())
}
