//! Event store port

use async_trait::async_trait;
use cadenza_domain::Event;
use thiserror::Error;

/// Errors that can occur during event store operations
#[derive(Error, Debug)]
pub enum EventStoreError {
    #[error("Event store backend error: {0}")]
    Backend(String),
}

/// Port for the event store collaborator
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist an event, returning its generated id.
    async fn add_event(&self, event: Event) -> Result<String, EventStoreError>;

    /// All events whose anchor time falls on the current day.
    async fn events_today(&self) -> Result<Vec<Event>, EventStoreError>;
}
