// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SDK key storage. Keys are stored as SHA-256 digests only.

use flowdesk_core::{AgentSession, FlowdeskError, SdkKey};
use rusqlite::params;

use crate::database::Database;

/// Store an issued key digest.
pub async fn insert_sdk_key(db: &Database, key: &SdkKey) -> Result<(), FlowdeskError> {
    let key = key.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sdk_keys (id, agent_session_id, key_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![key.id, key.agent_session_id, key.key_hash, key.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a key digest to its agent session.
pub async fn find_session_by_key_hash(
    db: &Database,
    key_hash: &str,
) -> Result<Option<AgentSession>, FlowdeskError> {
    let key_hash = key_hash.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.owner_user_id, s.name, s.business_type,
                        s.business_description, s.plan_id, s.created_at
                 FROM agent_sessions s
                 JOIN sdk_keys k ON k.agent_session_id = s.id
                 WHERE k.key_hash = ?1",
            )?;
            let result = stmt.query_row(params![key_hash], |row| {
                Ok(AgentSession {
                    id: row.get(0)?,
                    owner_user_id: row.get(1)?,
                    name: row.get(2)?,
                    business_type: row.get(3)?,
                    business_description: row.get(4)?,
                    plan_id: row.get(5)?,
                    created_at: row.get(6)?,
                })
            });
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
