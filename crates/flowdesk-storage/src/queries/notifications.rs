// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification persistence.

use flowdesk_core::{FlowdeskError, Notification};
use rusqlite::params;

use crate::database::Database;

/// Store a notification.
pub async fn insert_notification(
    db: &Database,
    notification: &Notification,
) -> Result<(), FlowdeskError> {
    let n = notification.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, message, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![n.id, n.user_id, n.message, n.is_read, n.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Notifications for a user, newest first.
pub async fn list_notifications(
    db: &Database,
    user_id: &str,
    unread_only: bool,
) -> Result<Vec<Notification>, FlowdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let sql = if unread_only {
                "SELECT id, user_id, message, is_read, created_at FROM notifications
                 WHERE user_id = ?1 AND is_read = 0
                 ORDER BY created_at DESC, rowid DESC"
            } else {
                "SELECT id, user_id, message, is_read, created_at FROM notifications
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            };
            let mut stmt = conn.prepare(sql)?;
            let notifications = stmt
                .query_map(params![user_id], |row| {
                    Ok(Notification {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        message: row.get(2)?,
                        is_read: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notifications)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark one notification read. Unknown IDs are ignored.
pub async fn mark_notification_read(db: &Database, id: &str) -> Result<(), FlowdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
