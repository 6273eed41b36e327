// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket push of user notifications.
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "unread_count", "count": 2}
//! {"type": "notification", "message": "Your order #... is now in progress.", "unread_count": 3}
//! ```
//!
//! The first frame reports the stored unread count at connect time; each
//! following frame is one live notification. Clients only listen.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::AppState;

/// Query parameters for GET /api/ws/notifications.
#[derive(Debug, Deserialize)]
pub struct NotificationsParams {
    pub user_id: String,
}

/// WebSocket upgrade handler.
pub async fn notifications_ws(
    ws: WebSocketUpgrade,
    Query(params): Query<NotificationsParams>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.user_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    // Subscribe before reading the count so nothing lands in the gap.
    let mut events = state.hub.subscribe(&user_id);

    let unread = match state.store.list_notifications(&user_id, true).await {
        Ok(list) => list.len() as i64,
        Err(e) => {
            warn!(error = %e, user_id = %user_id, "failed to load unread count");
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();

    let hello = serde_json::json!({ "type": "unread_count", "count": unread });
    if sender
        .send(Message::Text(hello.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ev) => {
                    let frame = serde_json::json!({
                        "type": "notification",
                        "message": ev.message,
                        "unread_count": ev.unread_count,
                    });
                    if sender
                        .send(Message::Text(frame.to_string().into()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(user_id = %user_id, skipped, "notification socket lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(error = %e, "notification socket error");
                    break;
                }
                _ => {} // Clients only listen; ignore anything they send
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_require_user_id() {
        let ok: NotificationsParams = serde_json::from_str(r#"{"user_id": "u-1"}"#).unwrap();
        assert_eq!(ok.user_id, "u-1");
        assert!(serde_json::from_str::<NotificationsParams>("{}").is_err());
    }

    #[test]
    fn frames_have_stable_shapes() {
        let hello = serde_json::json!({ "type": "unread_count", "count": 2 });
        assert_eq!(hello["type"], "unread_count");

        let frame = serde_json::json!({
            "type": "notification",
            "message": "Your order #o-1 is now in progress.",
            "unread_count": 3,
        });
        assert_eq!(frame["type"], "notification");
        assert_eq!(frame["unread_count"], 3);
    }
}
