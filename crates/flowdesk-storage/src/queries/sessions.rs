// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent session CRUD operations.

use flowdesk_core::{AgentSession, FlowdeskError};
use rusqlite::params;

use crate::database::Database;

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<AgentSession, rusqlite::Error> {
    Ok(AgentSession {
        id: row.get(0)?,
        owner_user_id: row.get(1)?,
        name: row.get(2)?,
        business_type: row.get(3)?,
        business_description: row.get(4)?,
        plan_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const SESSION_COLUMNS: &str =
    "id, owner_user_id, name, business_type, business_description, plan_id, created_at";

/// Create a new agent session.
pub async fn create_agent_session(
    db: &Database,
    session: &AgentSession,
) -> Result<(), FlowdeskError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO agent_sessions (id, owner_user_id, name, business_type,
                                             business_description, plan_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id,
                    session.owner_user_id,
                    session.name,
                    session.business_type,
                    session.business_description,
                    session.plan_id,
                    session.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an agent session by ID.
pub async fn get_agent_session(
    db: &Database,
    id: &str,
) -> Result<Option<AgentSession>, FlowdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM agent_sessions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let session = AgentSession {
            id: "sess-1".to_string(),
            owner_user_id: "owner-1".to_string(),
            name: "Corner Bakery Bot".to_string(),
            business_type: "Bakery".to_string(),
            business_description: "Fresh sourdough daily".to_string(),
            plan_id: "plan-free".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        create_agent_session(&db, &session).await.unwrap();

        let fetched = get_agent_session(&db, "sess-1").await.unwrap().unwrap();
        assert_eq!(fetched.business_type, "Bakery");
        assert_eq!(fetched.plan_id, "plan-free");
        assert!(get_agent_session(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let session = AgentSession {
            id: "sess-2".to_string(),
            owner_user_id: "owner-1".to_string(),
            name: "Bot".to_string(),
            business_type: "Bakery".to_string(),
            business_description: "".to_string(),
            plan_id: "plan-unknown".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        // Foreign key on plan_id.
        assert!(create_agent_session(&db, &session).await.is_err());
        db.close().await.unwrap();
    }
}
