//! Bonification CLI
//!
//! A terminal front end to the bonification engine:
//! - Score a single measurement against its target
//! - Simulate a full scenario (designs, licenses, jobs, SLA evaluation and
//!   payouts) against in-memory collaborators
//! - Show the effective engine configuration

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod scenario;

use commands::{score, simulate};
pub use error::{CliError, CliResult};
pub use output::OutputFormat;
pub use scenario::Scenario;

/// Bonification CLI application
#[derive(Parser)]
#[command(name = "bonif")]
#[command(about = "Manufacturing job scoring and SLA bonification", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file path
    #[arg(short, long, env = "BONIF_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Score one measurement against its target
    Score(score::ScoreArgs),

    /// Run a scenario file end to end
    Simulate(simulate::SimulateArgs),

    /// Show the effective configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Score(args) => score::execute(args),
        Commands::Simulate(args) => simulate::execute(args, &config).await,
        Commands::Config => output::print_json(&config),
    }
}
