//! Pairtomo Command-Line Interface
//!
//! Generates the measurement circuits for pairwise quantum state tomography
//! and writes them as OpenQASM or JSON.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{generate, plan, version};
use config::Config;

/// Pairtomo - pairwise quantum state tomography circuit generation
#[derive(Parser)]
#[command(name = "pairtomo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.pairtomo/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the tomography circuits for a preparation circuit
    Generate(generate::GenerateArgs),

    /// Show the measurement settings for a number of qubits
    Plan {
        /// Number of measured qubits
        #[arg(short = 'n', long)]
        qubits: usize,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, config: Option<&Config>) {
    let filter = match verbose {
        0 => match config.and_then(|c| c.log_level.as_deref()) {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        },
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    init_logging(cli.verbose, config.as_ref().ok());

    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|config| match &cli.command {
            Commands::Generate(args) => generate::execute(args, &config),
            Commands::Plan { qubits } => plan::execute(*qubits),
            Commands::Version => {
                version::execute();
                Ok(())
            }
        });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
