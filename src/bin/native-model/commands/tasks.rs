//! `native-model tasks` command

use anyhow::Result;

use native_model::ops::build_model;
use native_model::{GlobalContext, TaskPlan};

use crate::cli::TasksArgs;

pub fn execute(args: TasksArgs, ctx: &GlobalContext) -> Result<()> {
    let mut model = build_model(ctx)?;
    let mut plan = TaskPlan::new();
    let wired = model.wire_binaries(&mut plan)?;
    tracing::debug!("Wired {} binaries", wired);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for task in plan.tasks() {
        if task.depends_on.is_empty() {
            println!("{} [{}]", task.name, task.kind.as_str());
        } else {
            println!(
                "{} [{}] <- {}",
                task.name,
                task.kind.as_str(),
                task.depends_on.join(", ")
            );
        }
    }
    println!("assemble <- {}", plan.assemble_dependencies().join(", "));

    Ok(())
}
