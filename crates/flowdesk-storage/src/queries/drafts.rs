// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order draft persistence.
//!
//! Drafts are stored as opaque JSON blobs keyed by user. The order flow
//! owns the shape; this layer only upserts, loads and expires them.

use flowdesk_core::FlowdeskError;
use rusqlite::params;

use crate::database::Database;

/// Insert or replace the draft for a user.
pub async fn save_draft(
    db: &Database,
    user_id: &str,
    draft: &str,
    updated_at: &str,
) -> Result<(), FlowdeskError> {
    let user_id = user_id.to_string();
    let draft = draft.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO order_drafts (user_id, draft, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET draft = ?2, updated_at = ?3",
                params![user_id, draft, updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load the draft for a user, if one exists.
pub async fn load_draft(db: &Database, user_id: &str) -> Result<Option<String>, FlowdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT draft FROM order_drafts WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            );
            match result {
                Ok(draft) => Ok(Some(draft)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove the draft for a user. Deleting a missing draft is not an error.
pub async fn delete_draft(db: &Database, user_id: &str) -> Result<(), FlowdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM order_drafts WHERE user_id = ?1",
                params![user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete all drafts last touched strictly before `cutoff`.
///
/// Returns the number of drafts removed. RFC 3339 timestamps in a single
/// offset compare correctly as text.
pub async fn expire_drafts(db: &Database, cutoff: &str) -> Result<u64, FlowdeskError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM order_drafts WHERE updated_at < ?1",
                params![cutoff],
            )?;
            Ok(removed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn save_load_replace_delete() {
        let (_dir, db) = test_db().await;
        assert_eq!(load_draft(&db, "u1").await.unwrap(), None);

        save_draft(&db, "u1", r#"{"service":"AI Chatbot"}"#, "2026-01-01T00:00:00+00:00")
            .await
            .unwrap();
        assert_eq!(
            load_draft(&db, "u1").await.unwrap().as_deref(),
            Some(r#"{"service":"AI Chatbot"}"#)
        );

        save_draft(&db, "u1", r#"{"service":"Workflow Design"}"#, "2026-01-01T00:01:00+00:00")
            .await
            .unwrap();
        assert_eq!(
            load_draft(&db, "u1").await.unwrap().as_deref(),
            Some(r#"{"service":"Workflow Design"}"#)
        );

        delete_draft(&db, "u1").await.unwrap();
        assert_eq!(load_draft(&db, "u1").await.unwrap(), None);
        // Second delete is a no-op.
        delete_draft(&db, "u1").await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn expiry_removes_only_stale_drafts() {
        let (_dir, db) = test_db().await;
        save_draft(&db, "stale", "{}", "2026-01-01T00:00:00+00:00").await.unwrap();
        save_draft(&db, "fresh", "{}", "2026-01-02T00:00:00+00:00").await.unwrap();

        let removed = expire_drafts(&db, "2026-01-01T12:00:00+00:00").await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(load_draft(&db, "stale").await.unwrap(), None);
        assert!(load_draft(&db, "fresh").await.unwrap().is_some());
        db.close().await.unwrap();
    }
}
