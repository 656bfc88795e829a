//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types. Only title,
//! location, content, start and end take part in matching; everything else
//! is metadata the remote service hands back and is never copied.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server-assigned identifier, `None` until the remote has stored the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub content: Option<String>,
    pub start: EventTime,
    pub end: EventTime,

    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    /// Last modification timestamp reported by the remote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// An event attendee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventTime {
    /// UTC instant used for ordering; all-day events start at midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Event {
    pub fn new(title: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Event {
            id: None,
            title: Some(title.into()),
            location: None,
            content: None,
            start,
            end,
            status: EventStatus::default(),
            attendees: Vec::new(),
            updated: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// A fresh event carrying only the matching fields, suitable for
    /// inserting into another calendar.
    pub fn copy_for_insert(&self) -> Event {
        Event {
            id: None,
            title: self.title.clone(),
            location: self.location.clone(),
            content: self.content.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            status: EventStatus::default(),
            attendees: Vec::new(),
            updated: None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => write!(f, "{title}"),
            _ => write!(f, "(No title)"),
        }
    }
}
