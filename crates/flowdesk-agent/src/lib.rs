// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan-gated AI customer-service sessions.
//!
//! A business owner creates an agent session describing their business; the
//! service then answers customer messages in the business's voice over the
//! web dashboard, embedded SDK widgets, and bound Telegram bots. Every
//! conversation meters its messages against the session's plan.
//!
//! # Components
//!
//! - [`AgentService`] - session lifecycle, key issuing, and the chat turn
//! - [`ConversationKey`] - channel addressing (web, SDK, Telegram)
//! - [`prompt`] - persona prompt assembly
//! - [`keys`] - SDK key generation and hashing

pub mod channel;
pub mod keys;
pub mod prompt;
pub mod service;

pub use channel::{ConversationKey, ensure_channel_allowed};
pub use service::{AgentReply, AgentService};
