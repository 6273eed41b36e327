// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram bot-token bindings.
//!
//! Each tenant-supplied bot token maps to exactly one agent session; the
//! Telegram channel starts one poller per binding.

use flowdesk_core::FlowdeskError;
use rusqlite::params;

use crate::database::Database;

/// Bind a bot token to an agent session, replacing any previous binding of
/// the same token.
pub async fn upsert_telegram_binding(
    db: &Database,
    bot_token: &str,
    agent_session_id: &str,
) -> Result<(), FlowdeskError> {
    let bot_token = bot_token.to_string();
    let agent_session_id = agent_session_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO telegram_bindings (bot_token, agent_session_id)
                 VALUES (?1, ?2)
                 ON CONFLICT(bot_token) DO UPDATE SET agent_session_id = ?2",
                params![bot_token, agent_session_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The agent session a bot token is bound to, if any.
pub async fn get_telegram_binding(
    db: &Database,
    bot_token: &str,
) -> Result<Option<String>, FlowdeskError> {
    let bot_token = bot_token.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT agent_session_id FROM telegram_bindings WHERE bot_token = ?1",
                params![bot_token],
                |row| row.get(0),
            );
            match result {
                Ok(session_id) => Ok(Some(session_id)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All bindings as `(bot_token, agent_session_id)` pairs.
pub async fn list_telegram_bindings(db: &Database) -> Result<Vec<(String, String)>, FlowdeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT bot_token, agent_session_id FROM telegram_bindings")?;
            let bindings = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bindings)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::sessions::create_agent_session;
    use flowdesk_core::AgentSession;

    #[tokio::test]
    async fn upsert_replaces_existing_binding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        for id in ["sess-1", "sess-2"] {
            let session = AgentSession {
                id: id.to_string(),
                owner_user_id: "owner-1".to_string(),
                name: "Bot".to_string(),
                business_type: "Bakery".to_string(),
                business_description: "Bread".to_string(),
                plan_id: "plan-business".to_string(),
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
            };
            create_agent_session(&db, &session).await.unwrap();
        }

        upsert_telegram_binding(&db, "token-a", "sess-1").await.unwrap();
        upsert_telegram_binding(&db, "token-a", "sess-2").await.unwrap();
        assert_eq!(
            get_telegram_binding(&db, "token-a").await.unwrap().as_deref(),
            Some("sess-2")
        );
        assert!(get_telegram_binding(&db, "token-b").await.unwrap().is_none());
        assert_eq!(list_telegram_bindings(&db).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }
}
