//! Creates a valid Google session (access token) that we can use to call the gcal API

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::{self, base_dir};

/// Failures that only re-authenticating can fix.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Google OAuth session for {0} not found. Run `calsync auth` first.")]
    NotFound(String),

    #[error("Google rejected the session for {account}: {message}")]
    Rejected { account: String, message: String },
}

pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

impl Session {
    pub fn new(account_email: &str, data: SessionData) -> Self {
        Session {
            account_email: account_email.to_string(),
            data,
        }
    }

    fn path_for_account_email(account_email: &str) -> Result<PathBuf> {
        Ok(base_dir()?
            .join("session")
            .join(format!("{}.toml", file_slug(account_email))))
    }

    fn path(&self) -> Result<PathBuf> {
        Self::path_for_account_email(&self.account_email)
    }

    pub fn client(&self) -> Result<Client> {
        let creds = app_config::load()?;

        Ok(Client::new(
            creds.client_id,
            creds.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    /// Load a session and refresh it if expired.
    pub async fn load_valid(account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.is_expired() {
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = Self::path_for_account_email(account_email)?;

        if !path.exists() {
            return Err(SessionError::NotFound(account_email.to_string()).into());
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Session::new(account_email, data))
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = self.path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Owner-only, the file holds OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self) -> Result<()> {
        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .map_err(|e| SessionError::Rejected {
                account: self.account_email.clone(),
                message: e.to_string(),
            })?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()
    }

    /// Map an API error to `SessionError::Rejected` when Google refused the
    /// credentials themselves.
    pub fn check_rejected(&self, error: &impl std::fmt::Display) -> Option<SessionError> {
        let message = error.to_string();
        is_unauthorized(&message).then(|| SessionError::Rejected {
            account: self.account_email.clone(),
            message,
        })
    }
}

fn file_slug(account_email: &str) -> String {
    account_email.replace(['/', '\\', ':'], "_")
}

fn is_unauthorized(message: &str) -> bool {
    message.contains("401") || message.contains("invalid_grant") || message.contains("Unauthorized")
}
