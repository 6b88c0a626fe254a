//! native-model CLI - inspect the resolved model of a native project

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use native_model::util::diagnostic;
use native_model::{GlobalContext, ModelError};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ModelError>() {
            Some(model_error) => {
                let mut report = model_error.to_diagnostic();
                for cause in e.chain().filter(|c| c.downcast_ref::<ModelError>().is_none()) {
                    report = report.with_context(cause.to_string());
                }
                diagnostic::emit(&report, color);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("native_model=debug")
    } else {
        EnvFilter::new("native_model=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    match cli.command {
        Commands::Binaries(args) => commands::binaries::execute(args, &ctx),
        Commands::Tasks(args) => commands::tasks::execute(args, &ctx),
        Commands::Toolchain => commands::toolchain::execute(&ctx),
        Commands::Model => commands::model::execute(&ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
