// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation addressing across channels.
//!
//! Every channel resolves to one conversation row, and each conversation
//! meters its own usage against the owning session's plan: the web dashboard
//! gets the primary conversation, while each SDK external session and each
//! Telegram chat gets its own.

use flowdesk_core::{ChannelKind, FlowdeskError, Plan};

/// Where an inbound agent message originates.
#[derive(Debug, Clone)]
pub enum ConversationKey {
    /// The session owner chatting on the web dashboard.
    Primary { session_id: String },
    /// An embedded widget authenticating with an issued SDK key.
    Sdk {
        api_key: String,
        /// Caller-chosen id isolating one end-user's conversation.
        external_session: Option<String>,
    },
    /// A Telegram chat reaching a bound bot.
    Telegram { bot_token: String, chat_id: String },
}

impl ConversationKey {
    /// The channel this key addresses.
    pub fn channel(&self) -> ChannelKind {
        match self {
            ConversationKey::Primary { .. } => ChannelKind::Web,
            ConversationKey::Sdk { .. } => ChannelKind::Sdk,
            ConversationKey::Telegram { .. } => ChannelKind::Telegram,
        }
    }
}

/// Rejects channels the plan has not paid for. Web access is always allowed.
pub fn ensure_channel_allowed(plan: &Plan, channel: ChannelKind) -> Result<(), FlowdeskError> {
    let allowed = match channel {
        ChannelKind::Web => true,
        ChannelKind::Sdk => plan.allow_sdk,
        ChannelKind::Telegram => plan.allow_telegram,
    };
    if allowed {
        Ok(())
    } else {
        Err(FlowdeskError::InvalidInput(format!(
            "the {} plan does not include {} access",
            plan.name, channel
        )))
    }
}
