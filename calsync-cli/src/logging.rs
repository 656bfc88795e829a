//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over everything. Otherwise `--verbose` means debug, a
//! disabled `[logging]` section means errors only, and the configured level
//! applies. With `logging.file` set, lines are appended there without colors.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use calsync_core::config::LoggingSection;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init(config: &LoggingSection, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config, verbose)))
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.file_path().filter(|_| config.enabled) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .context("Failed to initialize logging")?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .try_init()
                .context("Failed to initialize logging")?;
        }
    }

    Ok(())
}

fn default_directive(config: &LoggingSection, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else if !config.enabled {
        "error".to_string()
    } else {
        config.level.clone()
    }
}
