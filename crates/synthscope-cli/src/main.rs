//! synthscope CLI - measurement workflows for analog synth characterization.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synthscope")]
#[command(author, version, about = "Synth parameter and signal-path measurement", long_about = None)]
struct Cli {
    /// Measurement profile (TOML). Defaults to the user profile if present.
    #[arg(long, global = true, value_name = "PROFILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a curve to a parameter sweep CSV
    Fit(commands::fit::FitArgs),

    /// Measure a filter's response from stimulus and output recordings
    Filter(commands::filter::FilterArgs),

    /// Compare two frequency-response tables
    Compare(commands::compare::CompareArgs),

    /// Measure chorus delay, LFO rate and stereo width
    Chorus(commands::chorus::ChorusArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = commands::common::load_profile(cli.config.as_deref())?;

    match cli.command {
        Commands::Fit(args) => commands::fit::run(args, &profile),
        Commands::Filter(args) => commands::filter::run(args, &profile),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Chorus(args) => commands::chorus::run(args, &profile),
    }
}
