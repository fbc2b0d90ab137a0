//! Calendar-like events stored and retrieved by the assistant.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// How precisely the event's time is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    ExactTime,
    Morning,
    Afternoon,
    Evening,
    DuringDay,
    Anytime,
}

/// Category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Birthday,
    Errand,
    Reminder,
    Meeting,
    Deadline,
}

/// An event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Anchor time of the event, interpreted with `precision`.
    pub around: DateTime<Utc>,
    pub precision: Precision,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub author: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        around: DateTime<Utc>,
        precision: Precision,
        description: impl Into<String>,
        kind: EventKind,
        author: impl Into<String>,
    ) -> Self {
        Self {
            around,
            precision,
            description: description.into(),
            kind,
            author: author.into(),
            created_at: Utc::now(),
        }
    }
}

/// Parse an ISO-8601 datetime, accepting both offset-carrying and naive
/// forms (naive values are taken as UTC).
pub fn parse_event_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    Err(format!("Invalid ISO-8601 datetime: {}", value))
}
