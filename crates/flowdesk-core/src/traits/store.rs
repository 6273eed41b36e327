// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait covering every persisted entity.

use async_trait::async_trait;

use crate::error::FlowdeskError;
use crate::types::{
    AgentMessage, AgentSession, ChannelKind, ChatTurn, CommitOutcome, Conversation,
    HealthStatus, Notification, OrderRecord, OrderStatus, Plan, SdkKey,
};

/// Persistence seam for the whole backend.
///
/// Implemented by the SQLite store; order flow, agent service, and gateway
/// all take `Arc<dyn Store>` so tests can substitute a temp-file database.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reports whether the backing database answers queries.
    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError>;

    // --- Chatbot turns ---

    /// Appends one processed chatbot turn.
    async fn insert_chat_turn(&self, turn: &ChatTurn) -> Result<(), FlowdeskError>;

    /// Returns the most recent turns for a visitor in chronological order.
    async fn recent_chat_turns(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, FlowdeskError>;

    // --- Order drafts ---

    /// Upserts the draft for a visitor. The payload is the serialized draft.
    async fn save_draft(&self, user_id: &str, draft_json: &str) -> Result<(), FlowdeskError>;

    /// Loads the serialized draft for a visitor, if any.
    async fn load_draft(&self, user_id: &str) -> Result<Option<String>, FlowdeskError>;

    /// Removes the draft for a visitor. Removing a missing draft is not an error.
    async fn delete_draft(&self, user_id: &str) -> Result<(), FlowdeskError>;

    /// Deletes drafts idle since before `cutoff` (RFC 3339). Returns the count.
    async fn expire_drafts(&self, cutoff: &str) -> Result<u64, FlowdeskError>;

    // --- Orders ---

    async fn insert_order(&self, order: &OrderRecord) -> Result<(), FlowdeskError>;

    async fn get_order(&self, id: &str) -> Result<Option<OrderRecord>, FlowdeskError>;

    /// Sets an order's status and returns the updated row.
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<OrderRecord, FlowdeskError>;

    // --- Plans ---

    async fn get_plan(&self, id: &str) -> Result<Option<Plan>, FlowdeskError>;

    async fn get_plan_by_name(&self, name: &str) -> Result<Option<Plan>, FlowdeskError>;

    // --- Agent sessions ---

    async fn create_agent_session(&self, session: &AgentSession) -> Result<(), FlowdeskError>;

    async fn get_agent_session(&self, id: &str) -> Result<Option<AgentSession>, FlowdeskError>;

    // --- Conversations ---

    /// Finds the conversation for `(session, channel, external_id)`, creating
    /// it with a zero counter on first contact.
    async fn get_or_create_conversation(
        &self,
        agent_session_id: &str,
        channel: ChannelKind,
        external_id: Option<&str>,
    ) -> Result<Conversation, FlowdeskError>;

    /// Returns a conversation's stored entries in chronological order.
    async fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<AgentMessage>, FlowdeskError>;

    /// Atomically re-checks the quota, appends the user and assistant
    /// entries, and increments the counter. A conversation at or over
    /// `limit` yields [`CommitOutcome::Rejected`] and writes nothing.
    async fn commit_exchange(
        &self,
        conversation_id: &str,
        limit: i64,
        user_entry: &AgentMessage,
        assistant_entry: &AgentMessage,
    ) -> Result<CommitOutcome, FlowdeskError>;

    // --- SDK keys ---

    async fn insert_sdk_key(&self, key: &SdkKey) -> Result<(), FlowdeskError>;

    /// Resolves an agent session from a key digest.
    async fn find_session_by_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<AgentSession>, FlowdeskError>;

    // --- Telegram bindings ---

    async fn upsert_telegram_binding(
        &self,
        bot_token: &str,
        agent_session_id: &str,
    ) -> Result<(), FlowdeskError>;

    async fn get_telegram_binding(
        &self,
        bot_token: &str,
    ) -> Result<Option<String>, FlowdeskError>;

    /// All `(bot_token, agent_session_id)` bindings, for adapter startup.
    async fn list_telegram_bindings(&self) -> Result<Vec<(String, String)>, FlowdeskError>;

    // --- Notifications ---

    async fn insert_notification(&self, notification: &Notification)
        -> Result<(), FlowdeskError>;

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>, FlowdeskError>;

    async fn mark_notification_read(&self, id: &str) -> Result<(), FlowdeskError>;
}
