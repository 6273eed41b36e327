// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live notification fan-out.
//!
//! Notifications are always persisted first; delivery over an open
//! WebSocket is best-effort on top. A user with no connected socket
//! simply picks the notification up from storage later.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use flowdesk_core::{new_id, now_rfc3339, FlowdeskError, Notification, Notifier, Store};
use tokio::sync::broadcast;

/// What a connected socket receives when a notification lands.
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    pub message: String,
    /// Unread count after this notification was stored.
    pub unread_count: i64,
}

/// Per-user broadcast channels for connected notification sockets.
///
/// A user may hold several sockets at once (two browser tabs); each
/// subscriber gets every event. Publishing to a user with no open
/// socket is a no-op.
pub struct NotifyHub {
    channels: DashMap<String, broadcast::Sender<NotifyEvent>>,
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribes a socket to a user's events.
    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<NotifyEvent> {
        self.channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(32).0)
            .subscribe()
    }

    /// Delivers an event to every socket the user has open.
    pub fn publish(&self, user_id: &str, event: NotifyEvent) {
        // The guard must drop before the remove or DashMap deadlocks.
        let stale = match self.channels.get(user_id) {
            Some(tx) => tx.send(event).is_err(),
            None => return,
        };
        if stale {
            self.channels.remove(user_id);
        }
    }
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Notifier`] that persists the notification and mirrors it over the hub.
pub struct HubNotifier {
    store: Arc<dyn Store>,
    hub: Arc<NotifyHub>,
}

impl HubNotifier {
    pub fn new(store: Arc<dyn Store>, hub: Arc<NotifyHub>) -> Self {
        Self { store, hub }
    }
}

#[async_trait]
impl Notifier for HubNotifier {
    async fn notify(&self, user_id: &str, message: &str) -> Result<(), FlowdeskError> {
        let notification = Notification {
            id: new_id(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            is_read: false,
            created_at: now_rfc3339(),
        };
        self.store.insert_notification(&notification).await?;

        let unread_count = self
            .store
            .list_notifications(user_id, true)
            .await?
            .len() as i64;
        self.hub.publish(
            user_id,
            NotifyEvent {
                message: message.to_string(),
                unread_count,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_config::model::StorageConfig;
    use flowdesk_storage::SqliteStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn publish_reaches_every_subscriber() {
        let hub = NotifyHub::new();
        let mut rx_a = hub.subscribe("u-1");
        let mut rx_b = hub.subscribe("u-1");

        hub.publish(
            "u-1",
            NotifyEvent {
                message: "order ready".into(),
                unread_count: 3,
            },
        );

        let got_a = rx_a.recv().await.unwrap();
        let got_b = rx_b.recv().await.unwrap();
        assert_eq!(got_a.message, "order ready");
        assert_eq!(got_b.unread_count, 3);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = NotifyHub::new();
        hub.publish(
            "u-nobody",
            NotifyEvent {
                message: "lost".into(),
                unread_count: 1,
            },
        );
    }

    #[tokio::test]
    async fn other_users_do_not_receive_the_event() {
        let hub = NotifyHub::new();
        let mut rx_other = hub.subscribe("u-2");

        hub.publish(
            "u-1",
            NotifyEvent {
                message: "private".into(),
                unread_count: 1,
            },
        );

        assert!(matches!(
            rx_other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn hub_notifier_persists_then_broadcasts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flowdesk.db");
        let store = Arc::new(SqliteStore::new(StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        store.initialize().await.unwrap();

        let hub = Arc::new(NotifyHub::new());
        let notifier = HubNotifier::new(store.clone(), hub.clone());

        let mut rx = hub.subscribe("u-1");
        notifier.notify("u-1", "first").await.unwrap();
        notifier.notify("u-1", "second").await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, "first");
        assert_eq!(first.unread_count, 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.unread_count, 2);

        let stored = store.list_notifications("u-1", false).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|n| !n.is_read));
    }
}
