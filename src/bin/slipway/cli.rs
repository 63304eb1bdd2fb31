//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Slipway - a build-script generator for C, C++, and C# projects
#[derive(Parser)]
#[command(name = "slipway")]
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
    /// Generate build scripts from Slipway.toml
    Generate(GenerateArgs),

    /// Remove generated scripts and build outputs
    Clean(CleanArgs),

    /// List supported build-file formats and the project's packages
    Targets(TargetsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Build-file format to generate (e.g. gnu, vs2003)
    #[arg(short, long, default_value = "gnu")]
    pub target: String,

    /// Generate for a specific OS instead of the host
    #[arg(long)]
    pub os: Option<String>,

    /// Compiler family for makefile outputs (e.g. gcc, dmc)
    #[arg(long, default_value = "gcc")]
    pub cc: String,

    /// Print the resolved model as JSON instead of writing scripts
    #[arg(long)]
    pub dump: bool,

    /// Directory containing Slipway.toml (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Directory containing Slipway.toml (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Directory containing Slipway.toml (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
