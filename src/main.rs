//! Stacksight main entry point
//!
//! This is the command-line interface for the Stacksight analysis backend.

use clap::Parser;
use stacksight::analysis::{lookup_from_config, AnalysisService, JobStore, LinkCounter};
use stacksight::config::{load_config, Config};
use stacksight::server::run_server;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Stacksight: a website technology analysis service
///
/// Stacksight accepts website URLs over a REST API, detects the
/// technologies running on them, counts the links on the landing page,
/// and serves the results to polling clients.
#[derive(Parser, Debug)]
#[command(name = "stacksight")]
#[command(version = "1.0.0")]
#[command(about = "A website technology analysis service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to defaults without a file
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Wire up the store, collaborators, and service
    let store = JobStore::new();
    let lookup = lookup_from_config(&config.lookup)?;
    let links = Arc::new(LinkCounter::new(Duration::from_secs(
        config.analysis.link_timeout_secs,
    ))?);
    let service = AnalysisService::new(
        store,
        lookup,
        links,
        Duration::from_millis(config.analysis.pacing_delay_ms),
    );

    // Run the server until terminated
    match run_server(&config.server.bind, service).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stacksight=info,warn"),
            1 => EnvFilter::new("stacksight=debug,info"),
            2 => EnvFilter::new("stacksight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
