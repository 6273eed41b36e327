// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for LLM integrations.

use async_trait::async_trait;

use crate::error::FlowdeskError;
use crate::types::{CompletionRequest, CompletionResponse, HealthStatus};

/// Adapter for chat-completion providers.
///
/// Implementations handle authentication, transport, and transient retry;
/// callers see a single request/response seam. Failures surface as
/// [`FlowdeskError::Unavailable`] so callers can degrade without committing
/// any state.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stable adapter name used in logs and health output.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, FlowdeskError>;

    /// Reports whether the provider is reachable.
    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError>;
}
