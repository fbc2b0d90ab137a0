//! In-memory event store.

use async_trait::async_trait;
use cadenza_application::ports::event_store::{EventStore, EventStoreError};
use cadenza_domain::Event;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`EventStore`] implementation with sequential ids.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<(String, Event)>>,
    next_id: AtomicU64,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn add_event(&self, event: Event) -> Result<String, EventStoreError> {
        let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        debug!(event_id = %id, description = %event.description, "Stored event");
        self.events.write().await.push((id.clone(), event));
        Ok(id)
    }

    async fn events_today(&self) -> Result<Vec<Event>, EventStoreError> {
        let today = Utc::now().date_naive();
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|(_, event)| event.around.date_naive() == today)
            .map(|(_, event)| event.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_domain::{EventKind, Precision};
    use chrono::{DateTime, Duration};

    fn event(around: DateTime<Utc>, description: &str) -> Event {
        Event::new(
            around,
            Precision::DuringDay,
            description,
            EventKind::Reminder,
            "ada",
        )
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = InMemoryEventStore::new();
        let first = store.add_event(event(Utc::now(), "one")).await.unwrap();
        let second = store.add_event(event(Utc::now(), "two")).await.unwrap();
        assert_eq!(first, "evt-1");
        assert_eq!(second, "evt-2");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_events_today_filters_by_day() {
        let store = InMemoryEventStore::new();
        store.add_event(event(Utc::now(), "today")).await.unwrap();
        store
            .add_event(event(Utc::now() + Duration::days(2), "later"))
            .await
            .unwrap();
        store
            .add_event(event(Utc::now() - Duration::days(1), "yesterday"))
            .await
            .unwrap();

        let today = store.events_today().await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].description, "today");
    }
}
