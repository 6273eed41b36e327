// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Flowdesk agent sessions.
//!
//! Each stored bot binding gets its own teloxide long-polling dispatcher
//! routing private chats into [`AgentService`]. Every chat is a separate
//! metered conversation keyed by `(bot_token, chat_id)`.

pub mod handler;

use std::collections::HashMap;
use std::sync::Arc;

use flowdesk_agent::AgentService;
use flowdesk_core::FlowdeskError;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Runs one long-polling dispatcher per bound bot.
///
/// Dispatchers are spawned detached; [`TelegramFleet::shutdown`] aborts
/// them. A bot is identified by its token, so launching the same token
/// twice is a no-op while the first dispatcher is alive.
pub struct TelegramFleet {
    service: Arc<AgentService>,
    workers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TelegramFleet {
    pub fn new(service: Arc<AgentService>) -> Self {
        Self {
            service,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Starts long polling for the given bot, if not already running.
    pub async fn launch(&self, bot_token: &str) -> Result<(), FlowdeskError> {
        if bot_token.is_empty() {
            return Err(FlowdeskError::Channel {
                message: "bot token cannot be empty".into(),
                source: None,
            });
        }

        let mut workers = self.workers.lock().await;
        if workers.get(bot_token).is_some_and(|h| !h.is_finished()) {
            return Ok(()); // Already polling
        }

        let bot = Bot::new(bot_token);
        let service = self.service.clone();
        let token: Arc<str> = Arc::from(bot_token);

        info!(bot = bot_id(bot_token), "starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let dispatch_handler =
                Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                    let service = service.clone();
                    let token = token.clone();
                    async move {
                        handler::handle_message(bot, msg, service, token).await;
                        respond(())
                    }
                });

            Dispatcher::builder(bot, dispatch_handler)
                .default_handler(|_| async {}) // Silently ignore non-message updates
                .build()
                .dispatch()
                .await;
        });

        workers.insert(bot_token.to_string(), handle);
        Ok(())
    }

    /// Number of dispatchers currently polling.
    pub async fn active(&self) -> usize {
        let workers = self.workers.lock().await;
        workers.values().filter(|h| !h.is_finished()).count()
    }

    /// Aborts every dispatcher. In-flight turns are dropped.
    pub async fn shutdown(&self) {
        let mut workers = self.workers.lock().await;
        for (token, handle) in workers.drain() {
            debug!(bot = bot_id(&token), "stopping Telegram dispatcher");
            handle.abort();
        }
    }
}

/// The public numeric id part of a bot token, safe to log.
fn bot_id(token: &str) -> &str {
    match token.split_once(':') {
        Some((id, _)) => id,
        None => "<unparsed>",
    }
}
