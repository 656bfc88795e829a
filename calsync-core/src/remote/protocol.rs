//! Defines the JSON protocol used for communication between calsync
//! and provider binaries over stdin/stdout.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::client::{EventQuery, SortOrder};
use crate::event::Event;

const QUERY_TIMEOUT: Duration = Duration::from_secs(30);
const BATCH_TIMEOUT: Duration = Duration::from_secs(120);
/// Auth involves the user clicking through a browser consent screen.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;

    fn timeout() -> Duration {
        QUERY_TIMEOUT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListEvents,
    InsertEvents,
    DeleteEvents,
}

/// Request sent from calsync to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Distinguishes failures the user must fix by re-authenticating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    #[default]
    Remote,
}

/// Response sent from provider to calsync.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        data: T,
    },
    Error {
        error: String,
        #[serde(default)]
        kind: ErrorKind,
    },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap_or_else(|e| {
            Response::<()>::error(&format!("Failed to serialize response: {e}"), ErrorKind::Remote)
        })
    }
}

impl Response<()> {
    pub fn error(msg: &str, kind: ErrorKind) -> String {
        let response = Response::<()>::Error {
            error: msg.to_string(),
            kind,
        };
        serde_json::to_string(&response).unwrap_or_else(|_| {
            r#"{"status":"error","error":"Failed to serialize error"}"#.to_string()
        })
    }
}

/// Run the provider's interactive authentication flow.
#[derive(Debug, Serialize, Deserialize)]
pub struct Authenticate {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for Authenticate {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Authenticate
    }

    fn timeout() -> Duration {
        AUTH_TIMEOUT
    }
}

/// List events on one calendar whose start falls in `[time_min, time_max]`.
/// Times are RFC 3339 on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    /// Provider-specific config (e.g., google_account)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_min: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: usize,
    #[serde(default)]
    pub order: SortOrder,
}

impl ListEvents {
    pub fn new(remote_config: serde_json::Map<String, serde_json::Value>, query: &EventQuery) -> Self {
        ListEvents {
            remote_config,
            calendar_id: query.calendar_id.clone(),
            time_min: query.min_start,
            time_max: query.max_start,
            max_results: query.max_results,
            order: query.order,
        }
    }

    /// The query this command was built from.
    pub fn query(&self) -> EventQuery {
        EventQuery {
            calendar_id: self.calendar_id.clone(),
            min_start: self.time_min,
            max_start: self.time_max,
            max_results: self.max_results,
            order: self.order,
        }
    }
}

impl ProviderCommand for ListEvents {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Insert several events; the provider answers with those it stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertEvents {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub events: Vec<Event>,
}

impl ProviderCommand for InsertEvents {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::InsertEvents
    }

    fn timeout() -> Duration {
        BATCH_TIMEOUT
    }
}

/// Delete several events by id; the provider answers with those it removed.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvents {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub events: Vec<Event>,
}

impl ProviderCommand for DeleteEvents {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::DeleteEvents
    }

    fn timeout() -> Duration {
        BATCH_TIMEOUT
    }
}
