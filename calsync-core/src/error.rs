//! Error types for calsync.

use thiserror::Error;

/// Errors that can occur in calsync operations.
#[derive(Error, Debug)]
pub enum CalSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid copy criteria pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Failed to query events from {calendar}: {message}")]
    RemoteQuery { calendar: String, message: String },

    #[error("Batch write to {calendar} failed: {message}")]
    RemoteWrite { calendar: String, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalSyncError {
    /// Whether a failed call may succeed if issued again unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CalSyncError::RemoteQuery { .. }
                | CalSyncError::RemoteWrite { .. }
                | CalSyncError::ProviderTimeout(_)
        )
    }
}

/// Result type alias for calsync operations.
pub type CalSyncResult<T> = Result<T, CalSyncError>;
