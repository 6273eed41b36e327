// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier that records deliveries instead of sending them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use flowdesk_core::traits::Notifier;
use flowdesk_core::FlowdeskError;

/// Captures every notification for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(user_id, message)` pairs delivered so far, in order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, message: &str) -> Result<(), FlowdeskError> {
        self.sent
            .lock()
            .await
            .push((user_id.to_string(), message.to_string()));
        Ok(())
    }
}
