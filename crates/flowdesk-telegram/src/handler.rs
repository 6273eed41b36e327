// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message routing from a Telegram chat into the agent service.
//!
//! Each private chat with a bound bot is its own metered conversation;
//! errors from the service are translated into customer-facing replies
//! instead of leaking internals into the chat.

use std::sync::Arc;

use flowdesk_agent::{AgentService, ConversationKey};
use flowdesk_core::FlowdeskError;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatKind, Recipient};
use tracing::{debug, error, warn};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`; the agent
/// only speaks to customers one-on-one.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Builds the conversation key for a message arriving at a bound bot.
pub fn conversation_key(bot_token: &str, msg: &Message) -> ConversationKey {
    ConversationKey::Telegram {
        bot_token: bot_token.to_string(),
        chat_id: msg.chat.id.0.to_string(),
    }
}

/// Translates a service error into a reply safe to show the customer.
pub fn friendly_reply(err: &FlowdeskError) -> String {
    match err {
        FlowdeskError::QuotaExceeded { limit, .. } => format!(
            "You have reached the limit of {limit} messages for this conversation. \
             Please contact the business directly to continue."
        ),
        FlowdeskError::Unavailable { .. } => {
            "Sorry, I'm having trouble replying right now. Please try again in a few minutes."
                .to_string()
        }
        FlowdeskError::InvalidInput(_) | FlowdeskError::NotFound { .. } => {
            "This agent is not available on Telegram right now.".to_string()
        }
        _ => "Sorry, something went wrong. Please try again.".to_string(),
    }
}

/// Handles one incoming update for a bound bot.
///
/// Non-DM and non-text messages are ignored. Service errors become
/// friendly replies; Telegram send failures are logged and dropped so
/// the dispatcher keeps polling.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    service: Arc<AgentService>,
    bot_token: Arc<str>,
) {
    if !is_dm(&msg) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return;
    }

    let Some(text) = msg.text() else {
        debug!(msg_id = msg.id.0, "ignoring non-text message");
        return;
    };

    let chat_id = msg.chat.id;

    // Best-effort typing indicator while the provider works.
    if let Err(e) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        debug!(error = %e, chat_id = chat_id.0, "typing indicator failed");
    }

    let key = conversation_key(&bot_token, &msg);
    let reply = match service.accept(key, text).await {
        Ok(reply) => reply.text,
        Err(e) => {
            warn!(error = %e, chat_id = chat_id.0, "telegram turn failed");
            friendly_reply(&e)
        }
    };

    if let Err(e) = bot.send_message(Recipient::Id(chat_id), reply).await {
        error!(error = %e, chat_id = chat_id.0, "failed to send telegram reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching Telegram Bot API structure.
    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    /// Build a mock group chat message.
    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    #[test]
    fn is_dm_private_chat() {
        let msg = make_private_message(12345, "hello");
        assert!(is_dm(&msg));
    }

    #[test]
    fn is_dm_group_chat() {
        let msg = make_group_message(12345, "hello");
        assert!(!is_dm(&msg));
    }

    #[test]
    fn conversation_key_maps_chat_id() {
        let msg = make_private_message(98765, "hello");
        let key = conversation_key("111:token", &msg);
        match key {
            ConversationKey::Telegram { bot_token, chat_id } => {
                assert_eq!(bot_token, "111:token");
                assert_eq!(chat_id, "98765");
            }
            other => panic!("expected Telegram key, got {other:?}"),
        }
    }

    #[test]
    fn quota_reply_names_the_limit() {
        let err = FlowdeskError::QuotaExceeded { used: 10, limit: 10 };
        let reply = friendly_reply(&err);
        assert!(reply.contains("limit of 10 messages"), "got: {reply}");
    }

    #[test]
    fn outage_reply_asks_to_retry() {
        let err = FlowdeskError::unavailable("openai", "timeout", None);
        let reply = friendly_reply(&err);
        assert!(reply.contains("try again"), "got: {reply}");
    }

    #[test]
    fn gated_plan_reply_is_generic() {
        let err = FlowdeskError::InvalidInput(
            "the free plan does not include telegram access".to_string(),
        );
        let reply = friendly_reply(&err);
        assert!(!reply.contains("free plan"), "got: {reply}");
        assert!(reply.contains("not available"), "got: {reply}");
    }
}
