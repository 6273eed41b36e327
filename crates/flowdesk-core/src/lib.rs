// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Flowdesk business-automation backend.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Flowdesk workspace. The order flow, the
//! agent service, the storage layer, and the channel adapters all speak the
//! vocabulary defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FlowdeskError;
pub use types::{
    AgentMessage, AgentSession, Attachment, ChannelKind, ChatTurn, CommitOutcome,
    CompletionMessage, CompletionRequest, CompletionResponse, Conversation, HealthStatus,
    MessageRole, Notification, OrderRecord, OrderStatus, Plan, SdkKey, new_id, now_rfc3339,
};

pub use traits::{CompletionProvider, Notifier, Store};
