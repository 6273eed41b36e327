// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chatbot turn history operations.

use flowdesk_core::{ChatTurn, FlowdeskError};
use rusqlite::params;

use crate::database::Database;

/// Record one completed user/bot exchange.
pub async fn insert_chat_turn(db: &Database, turn: &ChatTurn) -> Result<(), FlowdeskError> {
    let turn = turn.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chat_turns (id, user_id, message, reply, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![turn.id, turn.user_id, turn.message, turn.reply, turn.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recent `limit` turns for a user, oldest first.
pub async fn recent_chat_turns(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ChatTurn>, FlowdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, message, reply, created_at
                 FROM chat_turns WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let mut turns = stmt
                .query_map(params![user_id, limit], |row| {
                    Ok(ChatTurn {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        message: row.get(2)?,
                        reply: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            turns.reverse();
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
