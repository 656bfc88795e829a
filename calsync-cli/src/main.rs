mod commands;
mod logging;
mod render;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::Result;
use calsync_core::config::CalsyncConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calsync")]
#[command(about = "Copy matching events from one remote calendar to another")]
struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output and list every event
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy matching upcoming events, then delete orphaned copies
    Sync,
    /// Show what a sync would change without writing anything
    Status,
    /// Authenticate with the configured provider
    Auth,
    /// Show config paths, writing a template config if none exists
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => CalsyncConfig::default_path()?,
    };

    match cli.command {
        Commands::Sync => {
            let config = load_config(&config_path, cli.verbose)?;
            commands::sync::run(&config).await
        }
        Commands::Status => {
            let config = load_config(&config_path, cli.verbose)?;
            commands::status::run(&config, cli.verbose).await
        }
        Commands::Auth => {
            let config = load_config(&config_path, cli.verbose)?;
            commands::auth::run(&config).await
        }
        Commands::Config => commands::config::run(&config_path),
    }
}

/// Load the config file and start logging as it describes.
fn load_config(path: &Path, verbose: bool) -> Result<CalsyncConfig> {
    let config = CalsyncConfig::load(path)?;
    logging::init(&config.logging, verbose)?;
    Ok(config)
}
