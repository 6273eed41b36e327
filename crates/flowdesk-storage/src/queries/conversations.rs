// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and usage-commit operations.
//!
//! `commit_exchange` is the single write path for agent history. It
//! re-checks the message counter inside the same transaction that inserts the
//! entries, so the per-conversation limit holds under concurrent turns.

use flowdesk_core::{
    AgentMessage, ChannelKind, CommitOutcome, Conversation, FlowdeskError, MessageRole,
};
use rusqlite::params;

use crate::database::Database;

fn row_to_conversation(row: &rusqlite::Row<'_>) -> Result<Conversation, rusqlite::Error> {
    let channel: String = row.get(2)?;
    Ok(Conversation {
        id: row.get(0)?,
        agent_session_id: row.get(1)?,
        channel: channel.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        external_id: row.get(3)?,
        messages_used: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const CONVERSATION_COLUMNS: &str =
    "id, agent_session_id, channel, external_id, messages_used, created_at";

/// Find the conversation for a channel endpoint, creating it on first
/// contact.
///
/// The lookup and insert run in one closure on the single writer thread, so
/// two first-contact turns cannot both insert.
pub async fn get_or_create_conversation(
    db: &Database,
    agent_session_id: &str,
    channel: ChannelKind,
    external_id: Option<&str>,
    id: &str,
    created_at: &str,
) -> Result<Conversation, FlowdeskError> {
    let agent_session_id = agent_session_id.to_string();
    let external_id = external_id.map(|s| s.to_string());
    let id = id.to_string();
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE agent_session_id = ?1 AND channel = ?2 AND external_id IS ?3"
            ))?;
            let found = stmt.query_row(
                params![agent_session_id, channel.to_string(), external_id],
                row_to_conversation,
            );
            match found {
                Ok(conversation) => Ok(conversation),
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    conn.execute(
                        "INSERT INTO conversations
                         (id, agent_session_id, channel, external_id, messages_used, created_at)
                         VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                        params![id, agent_session_id, channel.to_string(), external_id, created_at],
                    )?;
                    Ok(Conversation {
                        id,
                        agent_session_id,
                        channel,
                        external_id,
                        messages_used: 0,
                        created_at,
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All stored entries of a conversation, oldest first.
pub async fn conversation_messages(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<AgentMessage>, FlowdeskError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, role, content, created_at
                 FROM agent_messages WHERE conversation_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let messages = stmt
                .query_map(params![conversation_id], |row| {
                    let role: String = row.get(2)?;
                    Ok(AgentMessage {
                        id: row.get(0)?,
                        conversation_id: row.get(1)?,
                        role: role.parse::<MessageRole>().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                2,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically persist one user/assistant exchange against the conversation's
/// message allowance.
///
/// Re-reads `messages_used` inside the transaction; if the allowance is
/// already spent the transaction rolls back and nothing is written.
pub async fn commit_exchange(
    db: &Database,
    conversation_id: &str,
    limit: i64,
    user_entry: &AgentMessage,
    assistant_entry: &AgentMessage,
) -> Result<CommitOutcome, FlowdeskError> {
    let id = conversation_id.to_string();
    let user_entry = user_entry.clone();
    let assistant_entry = assistant_entry.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let used = tx.query_row(
                "SELECT messages_used FROM conversations WHERE id = ?1",
                params![id],
                |row| row.get::<_, i64>(0),
            );
            let used = match used {
                Ok(used) => used,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            if used >= limit {
                // Dropping the transaction rolls it back.
                return Ok(Some(CommitOutcome::Rejected { used, limit }));
            }
            for entry in [&user_entry, &assistant_entry] {
                tx.execute(
                    "INSERT INTO agent_messages (id, conversation_id, role, content, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        entry.id,
                        entry.conversation_id,
                        entry.role.to_string(),
                        entry.content,
                        entry.created_at,
                    ],
                )?;
            }
            tx.execute(
                "UPDATE conversations SET messages_used = messages_used + 1 WHERE id = ?1",
                params![id],
            )?;
            tx.commit()?;
            Ok(Some(CommitOutcome::Committed { used: used + 1 }))
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    outcome.ok_or_else(|| FlowdeskError::not_found("conversation", conversation_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::sessions::create_agent_session;
    use flowdesk_core::AgentSession;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        let session = AgentSession {
            id: "sess-1".to_string(),
            owner_user_id: "owner-1".to_string(),
            name: "Bot".to_string(),
            business_type: "Bakery".to_string(),
            business_description: "Bread".to_string(),
            plan_id: "plan-free".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        create_agent_session(&db, &session).await.unwrap();
        (dir, db)
    }

    fn entry(conversation_id: &str, role: MessageRole, n: u32) -> AgentMessage {
        AgentMessage {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            role,
            content: format!("{role} {n}"),
            created_at: format!("2026-01-01T00:00:{n:02}+00:00"),
        }
    }

    #[tokio::test]
    async fn endpoint_identity_is_stable() {
        let (_dir, db) = test_db().await;

        let web = get_or_create_conversation(
            &db, "sess-1", ChannelKind::Web, None, "c-web", "2026-01-01T00:00:00+00:00",
        )
        .await
        .unwrap();
        let again = get_or_create_conversation(
            &db, "sess-1", ChannelKind::Web, None, "c-other", "2026-01-01T00:01:00+00:00",
        )
        .await
        .unwrap();
        assert_eq!(web.id, again.id);

        let tg = get_or_create_conversation(
            &db, "sess-1", ChannelKind::Telegram, Some("4242"), "c-tg",
            "2026-01-01T00:02:00+00:00",
        )
        .await
        .unwrap();
        assert_ne!(tg.id, web.id);
        assert_eq!(tg.external_id.as_deref(), Some("4242"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn commit_increments_until_limit_then_rejects() {
        let (_dir, db) = test_db().await;
        let conv = get_or_create_conversation(
            &db, "sess-1", ChannelKind::Web, None, "c-1", "2026-01-01T00:00:00+00:00",
        )
        .await
        .unwrap();

        for n in 0..3 {
            let outcome = commit_exchange(
                &db,
                &conv.id,
                3,
                &entry(&conv.id, MessageRole::User, n * 2),
                &entry(&conv.id, MessageRole::Assistant, n * 2 + 1),
            )
            .await
            .unwrap();
            assert_eq!(outcome, CommitOutcome::Committed { used: (n + 1) as i64 });
        }

        let rejected = commit_exchange(
            &db,
            &conv.id,
            3,
            &entry(&conv.id, MessageRole::User, 10),
            &entry(&conv.id, MessageRole::Assistant, 11),
        )
        .await
        .unwrap();
        assert_eq!(rejected, CommitOutcome::Rejected { used: 3, limit: 3 });

        // Rejection wrote nothing.
        let messages = conversation_messages(&db, &conv.id).await.unwrap();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn commit_against_missing_conversation_is_not_found() {
        let (_dir, db) = test_db().await;
        let err = commit_exchange(
            &db,
            "ghost",
            3,
            &entry("ghost", MessageRole::User, 0),
            &entry("ghost", MessageRole::Assistant, 1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FlowdeskError::NotFound { .. }));
        db.close().await.unwrap();
    }
}
