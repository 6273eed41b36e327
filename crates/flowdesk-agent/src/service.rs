// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plan-gated agent service.
//!
//! One service instance serves every session. A turn resolves its
//! conversation, checks the plan quota, calls the provider, and commits the
//! exchange. Nothing is persisted before the provider succeeds, so a failed
//! call leaves history and usage untouched; the final quota check happens
//! inside the storage transaction, so two raced turns cannot both land on
//! the last message.

use std::sync::Arc;

use flowdesk_core::{
    AgentMessage, AgentSession, CommitOutcome, CompletionMessage, CompletionProvider,
    CompletionRequest, Conversation, FlowdeskError, MessageRole, Plan, SdkKey, Store, new_id,
    now_rfc3339,
};
use tracing::{debug, info};

use crate::channel::{ConversationKey, ensure_channel_allowed};
use crate::{keys, prompt};

/// One completed agent exchange.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    /// Messages used on this conversation, this exchange included.
    pub usage_used: i64,
    /// The plan's message allowance.
    pub usage_limit: i64,
}

/// Creates sessions, issues keys, and answers customer messages.
pub struct AgentService {
    store: Arc<dyn Store>,
    provider: Arc<dyn CompletionProvider>,
    default_plan: String,
    temperature: f32,
}

impl AgentService {
    pub fn new(
        store: Arc<dyn Store>,
        provider: Arc<dyn CompletionProvider>,
        default_plan: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            store,
            provider,
            default_plan: default_plan.into(),
            temperature,
        }
    }

    /// Creates an agent session on the named plan (or the default plan).
    ///
    /// Returns the stored session and the greeting acknowledging it.
    pub async fn create_session(
        &self,
        owner_user_id: &str,
        name: &str,
        business_type: &str,
        business_description: &str,
        plan_name: Option<&str>,
    ) -> Result<(AgentSession, String), FlowdeskError> {
        if business_type.trim().is_empty() || business_description.trim().is_empty() {
            return Err(FlowdeskError::InvalidInput(
                "Business type and description are required.".to_string(),
            ));
        }

        let plan_name = plan_name.unwrap_or(&self.default_plan);
        let plan = self
            .store
            .get_plan_by_name(plan_name)
            .await?
            .ok_or_else(|| FlowdeskError::not_found("plan", plan_name))?;

        let session = AgentSession {
            id: new_id(),
            owner_user_id: owner_user_id.to_string(),
            name: name.to_string(),
            business_type: business_type.to_string(),
            business_description: business_description.to_string(),
            plan_id: plan.id.clone(),
            created_at: now_rfc3339(),
        };
        self.store.create_agent_session(&session).await?;
        info!(session_id = %session.id, plan = %plan.name, "agent session created");

        let greeting = prompt::session_greeting(business_type);
        Ok((session, greeting))
    }

    /// Issues a fresh SDK key for the session and returns the plaintext.
    ///
    /// Only the digest is stored; the plaintext cannot be recovered later.
    pub async fn issue_key(&self, session_id: &str) -> Result<String, FlowdeskError> {
        let session = self
            .store
            .get_agent_session(session_id)
            .await?
            .ok_or_else(|| FlowdeskError::not_found("agent session", session_id))?;

        let (plaintext, digest) = keys::generate_key();
        self.store
            .insert_sdk_key(&SdkKey {
                id: new_id(),
                agent_session_id: session.id.clone(),
                key_hash: digest,
                created_at: now_rfc3339(),
            })
            .await?;
        info!(session_id = %session.id, "sdk key issued");
        Ok(plaintext)
    }

    /// Points a Telegram bot token at the session. Re-binding replaces the
    /// previous target.
    pub async fn bind_telegram(
        &self,
        bot_token: &str,
        session_id: &str,
    ) -> Result<(), FlowdeskError> {
        if bot_token.trim().is_empty() {
            return Err(FlowdeskError::InvalidInput(
                "Bot token is required.".to_string(),
            ));
        }
        let session = self
            .store
            .get_agent_session(session_id)
            .await?
            .ok_or_else(|| FlowdeskError::not_found("agent session", session_id))?;
        self.store
            .upsert_telegram_binding(bot_token, &session.id)
            .await?;
        info!(session_id = %session.id, "telegram binding saved");
        Ok(())
    }

    /// Answers one customer message on whichever channel it arrived.
    pub async fn accept(
        &self,
        key: ConversationKey,
        text: &str,
    ) -> Result<AgentReply, FlowdeskError> {
        if text.trim().is_empty() {
            return Err(FlowdeskError::InvalidInput(
                "Message is required".to_string(),
            ));
        }

        let (session, plan, conversation) = self.resolve(&key).await?;
        debug!(
            session_id = %session.id,
            conversation_id = %conversation.id,
            channel = %conversation.channel,
            used = conversation.messages_used,
            limit = plan.max_messages,
            "agent turn"
        );

        // Quota gate before spending provider tokens.
        if conversation.messages_used >= plan.max_messages {
            return Err(FlowdeskError::QuotaExceeded {
                used: conversation.messages_used,
                limit: plan.max_messages,
            });
        }

        let history = self.store.conversation_messages(&conversation.id).await?;
        let mut messages: Vec<CompletionMessage> = history
            .into_iter()
            .map(|m| CompletionMessage {
                role: m.role,
                content: m.content,
            })
            .collect();
        messages.push(CompletionMessage {
            role: MessageRole::User,
            content: text.to_string(),
        });

        let request = CompletionRequest {
            system: Some(prompt::persona_prompt(&session)),
            messages,
            model: plan.model.clone(),
            max_tokens: plan.max_tokens,
            temperature: self.temperature,
        };
        let response = self.provider.complete(request).await?;

        let now = now_rfc3339();
        let user_entry = AgentMessage {
            id: new_id(),
            conversation_id: conversation.id.clone(),
            role: MessageRole::User,
            content: text.to_string(),
            created_at: now.clone(),
        };
        let assistant_entry = AgentMessage {
            id: new_id(),
            conversation_id: conversation.id.clone(),
            role: MessageRole::Assistant,
            content: response.content.clone(),
            created_at: now,
        };

        match self
            .store
            .commit_exchange(
                &conversation.id,
                plan.max_messages,
                &user_entry,
                &assistant_entry,
            )
            .await?
        {
            CommitOutcome::Committed { used } => Ok(AgentReply {
                text: response.content,
                usage_used: used,
                usage_limit: plan.max_messages,
            }),
            CommitOutcome::Rejected { used, limit } => {
                Err(FlowdeskError::QuotaExceeded { used, limit })
            }
        }
    }

    /// Messages stored for a session's primary web conversation.
    pub async fn primary_history(
        &self,
        session_id: &str,
    ) -> Result<Vec<AgentMessage>, FlowdeskError> {
        let key = ConversationKey::Primary {
            session_id: session_id.to_string(),
        };
        let (_, _, conversation) = self.resolve(&key).await?;
        self.store.conversation_messages(&conversation.id).await
    }

    /// Maps a conversation key to its session, plan, and conversation row,
    /// enforcing the plan's channel capabilities.
    async fn resolve(
        &self,
        key: &ConversationKey,
    ) -> Result<(AgentSession, Plan, Conversation), FlowdeskError> {
        let (session, external_id) = match key {
            ConversationKey::Primary { session_id } => {
                let session = self
                    .store
                    .get_agent_session(session_id)
                    .await?
                    .ok_or_else(|| FlowdeskError::not_found("agent session", session_id))?;
                (session, None)
            }
            ConversationKey::Sdk {
                api_key,
                external_session,
            } => {
                let digest = keys::digest(api_key);
                let session = self
                    .store
                    .find_session_by_key_hash(&digest)
                    .await?
                    .ok_or_else(|| FlowdeskError::not_found("sdk key", truncate(&digest, 8)))?;
                (session, external_session.clone())
            }
            ConversationKey::Telegram { bot_token, chat_id } => {
                let session_id = self
                    .store
                    .get_telegram_binding(bot_token)
                    .await?
                    .ok_or_else(|| {
                        FlowdeskError::not_found("telegram binding", truncate(bot_token, 8))
                    })?;
                let session = self
                    .store
                    .get_agent_session(&session_id)
                    .await?
                    .ok_or_else(|| FlowdeskError::not_found("agent session", &session_id))?;
                (session, Some(chat_id.clone()))
            }
        };

        let plan = self
            .store
            .get_plan(&session.plan_id)
            .await?
            .ok_or_else(|| FlowdeskError::not_found("plan", &session.plan_id))?;
        ensure_channel_allowed(&plan, key.channel())?;

        let conversation = self
            .store
            .get_or_create_conversation(&session.id, key.channel(), external_id.as_deref())
            .await?;
        Ok((session, plan, conversation))
    }
}

/// First `n` characters, for identifying secrets in errors without leaking them.
fn truncate(value: &str, n: usize) -> String {
    value.chars().take(n).collect()
}
