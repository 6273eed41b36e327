// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `ScriptedProvider` implements `CompletionProvider` with pre-configured
//! replies, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use flowdesk_core::traits::CompletionProvider;
use flowdesk_core::types::{CompletionRequest, CompletionResponse, HealthStatus};
use flowdesk_core::FlowdeskError;

/// A mock completion provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "scripted reply" text is returned.
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<String>>>,
}

impl ScriptedProvider {
    /// Create a new scripted provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a scripted provider pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, text: String) {
        self.replies.lock().await.push_back(text);
    }

    /// Pop the next reply, or return the default.
    async fn next_reply(&self) -> String {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "scripted reply".to_string())
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted-provider"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, FlowdeskError> {
        Ok(CompletionResponse {
            content: self.next_reply().await,
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError> {
        Ok(HealthStatus::Healthy)
    }
}
