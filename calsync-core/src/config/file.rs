//! The calsync configuration file at ~/.config/calsync/config.toml

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::config::SyncConfig;
use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS};
use crate::criterion::CopyCriterion;
use crate::error::{CalSyncError, CalSyncResult};

/// Environment variables named `CALSYNC__<SECTION>__<KEY>` override the file.
const ENV_PREFIX: &str = "CALSYNC";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct CalsyncConfig {
    pub remote: RemoteSection,
    pub calendars: CalendarsSection,
    pub copy_criteria: CriteriaSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Which provider talks to the remote service, plus its own parameters
/// (e.g. `google_account`), passed through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    pub provider: String,
    #[serde(flatten)]
    pub params: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarsSection {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriteriaSection {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncSection {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Attempts per remote call; 1 disables retrying.
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Append log lines to this file instead of stderr
    pub file: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_retries() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_BASE_DELAY_MS
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SyncSection {
    fn default() -> Self {
        SyncSection {
            max_results: default_max_results(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            enabled: true,
            file: None,
            level: default_log_level(),
        }
    }
}

impl LoggingSection {
    /// The log file with `~` expanded.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .map(|file| PathBuf::from(shellexpand::tilde(file).into_owned()))
    }
}

impl CalsyncConfig {
    pub fn default_path() -> CalSyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalSyncError::Config("Could not determine config directory".into()))?
            .join("calsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the file at `path`, then apply `CALSYNC__*` environment overrides.
    pub fn load(path: &Path) -> CalSyncResult<Self> {
        if !path.exists() {
            return Err(CalSyncError::Config(format!(
                "Config file not found at {}\n\nCreate a template with:\n  calsync config",
                path.display()
            )));
        }

        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CalSyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalSyncError::Config(format!("{}: {e}", path.display())))
    }

    /// Validate and resolve the values the reconciler needs.
    pub fn sync_config(&self) -> CalSyncResult<SyncConfig> {
        let source = self.calendars.source.trim();
        let target = self.calendars.target.trim();

        if source.is_empty() || target.is_empty() {
            return Err(CalSyncError::Config(
                "Both calendars.source and calendars.target must be set".into(),
            ));
        }
        if source == target {
            return Err(CalSyncError::Config(format!(
                "calendars.source and calendars.target are both '{source}'"
            )));
        }
        if self.sync.max_results == 0 {
            return Err(CalSyncError::Config("sync.max_results must be at least 1".into()));
        }

        let criterion = CopyCriterion::parse(&self.copy_criteria.field, &self.copy_criteria.value)?;

        Ok(SyncConfig::new(source, target, criterion).with_max_results(self.sync.max_results))
    }

    /// Write a commented template for the user to fill in.
    pub fn create_default(path: &Path) -> CalSyncResult<()> {
        let contents = format!(
            "\
# calsync configuration
#
# Events on the source calendar whose copy_criteria field matches the
# regular expression are copied to the target calendar. Copies whose
# original disappears from the source are deleted again.

# [remote]
# provider = \"google\"
# google_account = \"you@example.com\"

# [calendars]
# source = \"team@group.calendar.google.com\"
# target = \"primary\"

# [copy_criteria]
# field = \"title\"   # title, location or content
# value = \"Sync\"    # regular expression

# [sync]
# max_results = {DEFAULT_MAX_RESULTS}
# retries = {DEFAULT_RETRY_ATTEMPTS}

# [logging]
# enabled = true
# file = \"~/.local/state/calsync/calsync.log\"
# level = \"info\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalSyncError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalSyncError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
