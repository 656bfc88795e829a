//! Conversion between calsync events and Google Calendar API events.

use anyhow::{Result, bail};
use calsync_core::{Attendee, Event, EventStatus, EventTime};
use google_calendar::types::EventDateTime;

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl FromGoogle for Event {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let start = match event.start.as_ref().and_then(from_google_time) {
            Some(start) => start,
            None => bail!("Event {} has no start time", event.id),
        };
        let end = match event.end.as_ref().and_then(from_google_time) {
            Some(end) => end,
            None => bail!("Event {} has no end time", event.id),
        };

        let status = match event.status.as_str() {
            "tentative" => EventStatus::Tentative,
            "cancelled" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        let attendees = event
            .attendees
            .iter()
            .map(|a| Attendee {
                name: non_empty(&a.display_name),
                email: a.email.clone(),
            })
            .collect();

        Ok(Event {
            id: non_empty(&event.id),
            title: non_empty(&event.summary),
            location: non_empty(&event.location),
            content: non_empty(&event.description),
            start,
            end,
            status,
            attendees,
            updated: event.updated,
        })
    }
}

/// Only the fields calsync copies; Google assigns the id.
impl ToGoogle for Event {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            summary: self.title.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            description: self.content.clone().unwrap_or_default(),
            start: Some(to_google_time(&self.start)),
            end: Some(to_google_time(&self.end)),
            ..Default::default()
        }
    }
}

fn from_google_time(time: &EventDateTime) -> Option<EventTime> {
    time.date_time
        .map(EventTime::DateTime)
        .or_else(|| time.date.map(EventTime::Date))
}

fn to_google_time(time: &EventTime) -> EventDateTime {
    match time {
        EventTime::Date(d) => EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::DateTime(dt) => EventDateTime {
            date: None,
            date_time: Some(*dt),
            time_zone: String::new(),
        },
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
