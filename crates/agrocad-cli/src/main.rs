//! # agrocad CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agrocad_cli::docid::{run_format, run_generate, run_validate, FormatArgs, GenerateArgs, ValidateArgs};
use agrocad_cli::seed::{run_seed, SeedArgs};

/// Agrocad Registry CLI
///
/// Works with the registry's CPF/CNPJ document rules from the shell:
/// validation, formatting, generation, and seed fixtures for local
/// development.
#[derive(Parser, Debug)]
#[command(name = "agrocad", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check CPF/CNPJ documents. Exits non-zero if any is invalid.
    Validate(ValidateArgs),

    /// Apply the standard punctuation mask to documents.
    Format(FormatArgs),

    /// Generate valid documents for test data.
    Generate(GenerateArgs),

    /// Emit a JSON fixture of producers and farms.
    Seed(SeedArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Format(args) => run_format(&args),
        Commands::Generate(args) => run_generate(&args),
        Commands::Seed(args) => run_seed(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
