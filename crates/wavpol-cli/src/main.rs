//! Wavpol CLI - wave polarization analysis from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wavpol")]
#[command(
    author,
    version,
    about = "Wave polarization analysis of three-component series",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the polarization analysis on a series file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Generate synthetic three-component test series
    Generate(commands::generate::GenerateArgs),

    /// Show samples, cadence, and batch layout of a series file
    Info(commands::info::InfoArgs),

    /// List, show, and save analysis presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
