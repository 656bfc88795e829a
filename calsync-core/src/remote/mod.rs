//! Remote calendar operations via providers.

pub mod protocol;
pub mod provider;

use async_trait::async_trait;

use crate::client::{CalendarClient, EventQuery};
use crate::config::RemoteSection;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::Event;
use crate::remote::protocol::{Authenticate, DeleteEvents, InsertEvents, ListEvents};
use crate::remote::provider::Provider;

/// A `CalendarClient` backed by a provider binary.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    provider: Provider,
    remote_config: serde_json::Map<String, serde_json::Value>,
}

impl From<&RemoteSection> for ProviderClient {
    fn from(section: &RemoteSection) -> Self {
        ProviderClient::new(
            Provider::from_name(&section.provider),
            section
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl ProviderClient {
    pub fn new(
        provider: Provider,
        remote_config: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        ProviderClient {
            provider,
            remote_config,
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Run the provider's authentication flow, returning the account identifier.
    pub async fn authenticate(&self) -> CalSyncResult<String> {
        self.provider
            .call(Authenticate {
                remote_config: self.remote_config.clone(),
            })
            .await
    }
}

#[async_trait]
impl CalendarClient for ProviderClient {
    async fn query_events(&self, query: &EventQuery) -> CalSyncResult<Vec<Event>> {
        let mut events = self
            .provider
            .call(ListEvents::new(self.remote_config.clone(), query))
            .await
            .map_err(|e| query_error(e, &query.calendar_id))?;

        events.truncate(query.max_results);
        Ok(events)
    }

    async fn batch_insert(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        self.provider
            .call(InsertEvents {
                remote_config: self.remote_config.clone(),
                calendar_id: calendar_id.to_string(),
                events: events.to_vec(),
            })
            .await
            .map_err(|e| write_error(e, calendar_id))
    }

    async fn batch_delete(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        self.provider
            .call(DeleteEvents {
                remote_config: self.remote_config.clone(),
                calendar_id: calendar_id.to_string(),
                events: events.to_vec(),
            })
            .await
            .map_err(|e| write_error(e, calendar_id))
    }
}

fn query_error(err: CalSyncError, calendar: &str) -> CalSyncError {
    match err {
        CalSyncError::Provider(message) => CalSyncError::RemoteQuery {
            calendar: calendar.to_string(),
            message,
        },
        other => other,
    }
}

fn write_error(err: CalSyncError, calendar: &str) -> CalSyncError {
    match err {
        CalSyncError::Provider(message) => CalSyncError::RemoteWrite {
            calendar: calendar.to_string(),
            message,
        },
        other => other,
    }
}
