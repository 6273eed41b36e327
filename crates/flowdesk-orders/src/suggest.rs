// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow name and detail suggestions via the completion provider.
//!
//! Model output is unruly; [`clean_suggestions`] strips list markers and
//! chatter and keeps at most three usable lines. An empty result is valid;
//! the flow tells the visitor to type their own.

use std::sync::Arc;

use flowdesk_core::{
    CompletionMessage, CompletionProvider, CompletionRequest, FlowdeskError, MessageRole,
};
use tracing::debug;

/// Word cap for suggested workflow names.
const NAME_MAX_WORDS: usize = 5;
/// Word cap for suggested workflow detail lines.
const DETAILS_MAX_WORDS: usize = 30;

/// Generates order suggestions through the configured completion provider.
pub struct Suggester {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    temperature: f32,
}

impl Suggester {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Up to three short workflow name candidates.
    pub async fn workflow_names(
        &self,
        service: &str,
        industry: &str,
    ) -> Result<Vec<String>, FlowdeskError> {
        let prompt = format!(
            "Suggest 3 short, catchy workflow names for a {service} project \
             in the {industry} industry. Reply with one name per line and \
             nothing else."
        );
        let raw = self.complete(prompt).await?;
        Ok(clean_suggestions(&raw, NAME_MAX_WORDS))
    }

    /// Up to three one-line workflow descriptions.
    pub async fn workflow_details(
        &self,
        workflow_name: &str,
        service: &str,
        industry: &str,
    ) -> Result<Vec<String>, FlowdeskError> {
        let prompt = format!(
            "Suggest 3 one-sentence descriptions of what a workflow named \
             \"{workflow_name}\" ({service}, {industry} industry) should do. \
             Reply with one description per line and nothing else."
        );
        let raw = self.complete(prompt).await?;
        Ok(clean_suggestions(&raw, DETAILS_MAX_WORDS))
    }

    async fn complete(&self, prompt: String) -> Result<String, FlowdeskError> {
        let request = CompletionRequest {
            system: None,
            messages: vec![CompletionMessage {
                role: MessageRole::User,
                content: prompt,
            }],
            model: self.model.clone(),
            max_tokens: 200,
            temperature: self.temperature,
        };
        let response = self.provider.complete(request).await?;
        debug!(provider = self.provider.name(), "suggestions generated");
        Ok(response.content)
    }
}

/// Normalize raw model output into at most three clean suggestion lines.
///
/// Strips bullet and numbering prefixes, drops blank lines, lines over the
/// word cap, and "here are ..." style headers.
pub fn clean_suggestions(raw: &str, max_words: usize) -> Vec<String> {
    raw.lines()
        .map(|line| {
            // Strip list markers from the front only; "Pipeline 24" keeps
            // its trailing digits.
            line.trim()
                .trim_start_matches(|c: char| "•-0123456789. ".contains(c))
                .trim_end()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .filter(|line| line.split_whitespace().count() <= max_words)
        .filter(|line| !line.to_lowercase().starts_with("here are"))
        .take(3)
        .collect()
}
