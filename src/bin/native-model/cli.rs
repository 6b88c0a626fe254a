//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};

/// native-model - Resolve the build variants of a native project
#[derive(Parser)]
#[command(name = "native-model")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the binaries the model resolves to
    Binaries(BinariesArgs),

    /// Show the task plan derived from the binaries
    Tasks(TasksArgs),

    /// Show the tool chains found on this host
    Toolchain,

    /// Show every axis of the resolved model
    Model,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BinariesArgs {
    /// Print the binaries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
