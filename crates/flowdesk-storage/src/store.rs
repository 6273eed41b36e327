// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`Store`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use flowdesk_config::model::StorageConfig;
use flowdesk_core::{
    AgentMessage, AgentSession, ChannelKind, ChatTurn, CommitOutcome, Conversation,
    FlowdeskError, HealthStatus, Notification, OrderRecord, OrderStatus, Plan, SdkKey, Store,
    new_id, now_rfc3339,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize)
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), FlowdeskError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FlowdeskError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoint the WAL ahead of process exit.
    pub async fn close(&self) -> Result<(), FlowdeskError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, FlowdeskError> {
        self.db.get().ok_or_else(|| FlowdeskError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn health_check(&self) -> Result<HealthStatus, FlowdeskError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn insert_chat_turn(&self, turn: &ChatTurn) -> Result<(), FlowdeskError> {
        queries::turns::insert_chat_turn(self.db()?, turn).await
    }

    async fn recent_chat_turns(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, FlowdeskError> {
        queries::turns::recent_chat_turns(self.db()?, user_id, limit).await
    }

    async fn save_draft(&self, user_id: &str, draft_json: &str) -> Result<(), FlowdeskError> {
        queries::drafts::save_draft(self.db()?, user_id, draft_json, &now_rfc3339()).await
    }

    async fn load_draft(&self, user_id: &str) -> Result<Option<String>, FlowdeskError> {
        queries::drafts::load_draft(self.db()?, user_id).await
    }

    async fn delete_draft(&self, user_id: &str) -> Result<(), FlowdeskError> {
        queries::drafts::delete_draft(self.db()?, user_id).await
    }

    async fn expire_drafts(&self, cutoff: &str) -> Result<u64, FlowdeskError> {
        queries::drafts::expire_drafts(self.db()?, cutoff).await
    }

    async fn insert_order(&self, order: &OrderRecord) -> Result<(), FlowdeskError> {
        queries::orders::insert_order(self.db()?, order).await
    }

    async fn get_order(&self, id: &str) -> Result<Option<OrderRecord>, FlowdeskError> {
        queries::orders::get_order(self.db()?, id).await
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<OrderRecord, FlowdeskError> {
        queries::orders::update_order_status(self.db()?, id, status)
            .await?
            .ok_or_else(|| FlowdeskError::not_found("order", id))
    }

    async fn get_plan(&self, id: &str) -> Result<Option<Plan>, FlowdeskError> {
        queries::plans::get_plan(self.db()?, id).await
    }

    async fn get_plan_by_name(&self, name: &str) -> Result<Option<Plan>, FlowdeskError> {
        queries::plans::get_plan_by_name(self.db()?, name).await
    }

    async fn create_agent_session(&self, session: &AgentSession) -> Result<(), FlowdeskError> {
        queries::sessions::create_agent_session(self.db()?, session).await
    }

    async fn get_agent_session(&self, id: &str) -> Result<Option<AgentSession>, FlowdeskError> {
        queries::sessions::get_agent_session(self.db()?, id).await
    }

    async fn get_or_create_conversation(
        &self,
        agent_session_id: &str,
        channel: ChannelKind,
        external_id: Option<&str>,
    ) -> Result<Conversation, FlowdeskError> {
        queries::conversations::get_or_create_conversation(
            self.db()?,
            agent_session_id,
            channel,
            external_id,
            &new_id(),
            &now_rfc3339(),
        )
        .await
    }

    async fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<AgentMessage>, FlowdeskError> {
        queries::conversations::conversation_messages(self.db()?, conversation_id).await
    }

    async fn commit_exchange(
        &self,
        conversation_id: &str,
        limit: i64,
        user_entry: &AgentMessage,
        assistant_entry: &AgentMessage,
    ) -> Result<CommitOutcome, FlowdeskError> {
        queries::conversations::commit_exchange(
            self.db()?,
            conversation_id,
            limit,
            user_entry,
            assistant_entry,
        )
        .await
    }

    async fn insert_sdk_key(&self, key: &SdkKey) -> Result<(), FlowdeskError> {
        queries::keys::insert_sdk_key(self.db()?, key).await
    }

    async fn find_session_by_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<AgentSession>, FlowdeskError> {
        queries::keys::find_session_by_key_hash(self.db()?, key_hash).await
    }

    async fn upsert_telegram_binding(
        &self,
        bot_token: &str,
        agent_session_id: &str,
    ) -> Result<(), FlowdeskError> {
        queries::bindings::upsert_telegram_binding(self.db()?, bot_token, agent_session_id).await
    }

    async fn get_telegram_binding(
        &self,
        bot_token: &str,
    ) -> Result<Option<String>, FlowdeskError> {
        queries::bindings::get_telegram_binding(self.db()?, bot_token).await
    }

    async fn list_telegram_bindings(&self) -> Result<Vec<(String, String)>, FlowdeskError> {
        queries::bindings::list_telegram_bindings(self.db()?).await
    }

    async fn insert_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), FlowdeskError> {
        queries::notifications::insert_notification(self.db()?, notification).await
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>, FlowdeskError> {
        queries::notifications::list_notifications(self.db()?, user_id, unread_only).await
    }

    async fn mark_notification_read(&self, id: &str) -> Result<(), FlowdeskError> {
        queries::notifications::mark_notification_read(self.db()?, id).await
    }
}
