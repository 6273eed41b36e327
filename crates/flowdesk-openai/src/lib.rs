// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for the Flowdesk backend.
//!
//! This crate implements [`CompletionProvider`] for the OpenAI Chat
//! Completions API, used by the agent service for customer replies and by
//! the order flow for workflow suggestions.

pub mod client;
pub mod types;

use async_trait::async_trait;
use flowdesk_config::model::ProviderConfig;
use flowdesk_core::traits::CompletionProvider;
use flowdesk_core::types::{CompletionRequest, CompletionResponse, HealthStatus};
use flowdesk_core::FlowdeskError;
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::{ChatRequest, WireMessage};

/// OpenAI provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider from the given configuration.
    ///
    /// # API Key Resolution
    /// 1. `config.provider.api_key` if set
    /// 2. `OPENAI_API_KEY` environment variable
    /// 3. Returns error if neither is available
    pub fn new(config: &ProviderConfig) -> Result<Self, FlowdeskError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(&api_key, config.base_url.clone())?;

        info!(base_url = %config.base_url, "OpenAI provider initialized");

        Ok(Self { client })
    }
}

/// Converts a [`CompletionRequest`] to the wire format, placing the system
/// prompt (when present) ahead of the conversation.
fn to_chat_request(request: &CompletionRequest) -> ChatRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = &request.system {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }
    for m in &request.messages {
        messages.push(WireMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        });
    }

    ChatRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, FlowdeskError> {
        let api_request = to_chat_request(&request);
        let response = self.client.complete_chat(&api_request).await?;

        let content = response
            .choices
            .first()
            .ok_or_else(|| {
                FlowdeskError::unavailable("openai", "response contained no choices", None)
            })?
            .message
            .content
            .clone()
            .unwrap_or_default();

        Ok(CompletionResponse { content })
    }

    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError> {
        // A full check would make a lightweight API call, but we avoid
        // consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, FlowdeskError> {
    if let Some(key) = config_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        FlowdeskError::Config(
            "OpenAI API key not found. Set provider.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}
