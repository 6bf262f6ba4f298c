//! Realtime change notification.
//!
//! A write path publishes a small invalidation event (table, kind, record id);
//! subscribers re-fetch through the normal read path. The publisher never
//! pushes record payloads and never mutates subscriber state. Delivery is
//! best-effort and lossy: a slow subscriber misses events and recovers by
//! re-fetching, so nothing here retries or buffers beyond channel capacity.
//!
//! This module stops at the in-process seam. The outbound transport (SSE,
//! WebSocket) belongs to the embedding process; no HTTP route is attached
//! here.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEventType {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: &'static str,
    pub event_type: ChangeEventType,
    pub record_id: Uuid,
}

/// Per-(organization, table) broadcast fan-out. One feed is shared by the
/// whole process; channels are created lazily on first subscribe or publish.
pub struct ChangeFeed {
    channels: RwLock<HashMap<(Uuid, &'static str), broadcast::Sender<ChangeEvent>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    fn sender(&self, organization_id: Uuid, table: &'static str) -> broadcast::Sender<ChangeEvent> {
        if let Ok(channels) = self.channels.read() {
            if let Some(sender) = channels.get(&(organization_id, table)) {
                return sender.clone();
            }
        }

        let mut channels = match self.channels.write() {
            Ok(guard) => guard,
            // A poisoned lock only means another publisher panicked; the map
            // itself is still usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        channels
            .entry((organization_id, table))
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    pub fn subscribe(
        &self,
        organization_id: Uuid,
        table: &'static str,
    ) -> broadcast::Receiver<ChangeEvent> {
        self.sender(organization_id, table).subscribe()
    }

    /// Publish an event. Returns the number of subscribers it reached; zero
    /// subscribers is not an error.
    pub fn publish(
        &self,
        organization_id: Uuid,
        event_type: ChangeEventType,
        table: &'static str,
        record_id: Uuid,
    ) -> usize {
        let event = ChangeEvent {
            table,
            event_type,
            record_id,
        };
        self.sender(organization_id, table).send(event).unwrap_or(0)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_events_for_its_scope() {
        let feed = ChangeFeed::new();
        let org = Uuid::new_v4();
        let mut rx = feed.subscribe(org, "tasks");

        let record = Uuid::new_v4();
        let reached = feed.publish(org, ChangeEventType::Insert, "tasks", record);
        assert_eq!(reached, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, "tasks");
        assert_eq!(event.event_type, ChangeEventType::Insert);
        assert_eq!(event.record_id, record);
    }

    #[tokio::test]
    async fn events_do_not_cross_organizations() {
        let feed = ChangeFeed::new();
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        let mut rx_b = feed.subscribe(org_b, "tasks");

        feed.publish(org_a, ChangeEventType::Update, "tasks", Uuid::new_v4());
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn events_do_not_cross_tables() {
        let feed = ChangeFeed::new();
        let org = Uuid::new_v4();
        let mut rx = feed.subscribe(org, "issues");

        feed.publish(org, ChangeEventType::Delete, "tasks", Uuid::new_v4());
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let feed = ChangeFeed::new();
        let reached = feed.publish(
            Uuid::new_v4(),
            ChangeEventType::Insert,
            "workers",
            Uuid::new_v4(),
        );
        assert_eq!(reached, 0);
    }
}
