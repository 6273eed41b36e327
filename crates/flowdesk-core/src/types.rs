// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Flowdesk workspace.
//!
//! Timestamps are RFC 3339 strings throughout; identifiers are UUIDv4
//! strings generated at creation time.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of an entry in an agent conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One processed turn of the order-taking chatbot: the visitor's message and
/// the reply it produced. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    /// Visitor identity; the literal `"guest"` for anonymous visitors.
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub created_at: String,
}

/// A tenant's configured customer-service agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSession {
    pub id: String,
    pub owner_user_id: String,
    /// Display name the agent answers as.
    pub name: String,
    pub business_type: String,
    pub business_description: String,
    pub plan_id: String,
    pub created_at: String,
}

/// A usage plan governing how much an agent session may be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Maximum user messages per conversation.
    pub max_messages: i64,
    /// Completion token cap per reply.
    pub max_tokens: u32,
    /// Model identifier passed to the completion provider.
    pub model: String,
    pub price_cents: i64,
    pub allow_sdk: bool,
    pub allow_telegram: bool,
}

/// Channel through which a conversation reaches an agent session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Web,
    Sdk,
    Telegram,
}

/// One metered conversation against an agent session.
///
/// Every channel endpoint (the tenant's own web widget, each SDK external
/// session, each Telegram chat) gets its own conversation row and its own
/// message counter. `messages_used` is monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub agent_session_id: String,
    pub channel: ChannelKind,
    /// Per-channel endpoint identity: SDK external session id or Telegram
    /// chat id. `None` for the session's primary web conversation.
    pub external_id: Option<String>,
    pub messages_used: i64,
    pub created_at: String,
}

/// One stored entry of an agent conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

/// Outcome of the atomic quota-checked history commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Both entries inserted, counter incremented to `used`.
    Committed { used: i64 },
    /// A concurrent turn spent the last allowance first; nothing was written.
    Rejected { used: i64, limit: i64 },
}

/// An issued SDK API key. Only the SHA-256 digest is stored; the plaintext
/// secret is shown exactly once at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkKey {
    pub id: String,
    pub agent_session_id: String,
    pub key_hash: String,
    pub created_at: String,
}

/// Lifecycle of a submitted order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    ReadyForPayment,
    Completed,
    Cancelled,
}

/// A confirmed order as persisted at the end of the order-taking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub user_id: String,
    pub service: String,
    pub industry: String,
    /// Canonical underscored duration, e.g. `3_months`.
    pub host_duration: String,
    pub workflow_name: String,
    pub workflow_details: String,
    pub attachment_name: Option<String>,
    /// Total price in integer cents.
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: String,
}

/// A user-facing notification, persisted and pushed live when a socket is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Metadata of a file uploaded alongside a chatbot turn. The bytes themselves
/// are handled by the upload collaborator; the flow only records the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
}

/// One message of a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

/// A request to the completion provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<CompletionMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The provider's reply text.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
}

/// Component health as reported by `health_check` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Current UTC time as an RFC 3339 string, the only timestamp format stored.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fresh UUIDv4 identifier string.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
