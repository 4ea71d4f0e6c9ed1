//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Toolforge - staged bootstrap builds for self-hosting compiler toolchains
#[derive(Parser)]
#[command(name = "toolforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full bootstrap: assemble, three stages, install
    Run(RunArgs),

    /// Assemble the source tree without building anything
    Assemble(AssembleArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to Toolforge.toml (defaults to the current directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Number of parallel jobs (overrides the manifest)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct AssembleArgs {
    /// Path to Toolforge.toml (defaults to the current directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
