// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan lookups. Plans are seeded by migration and read-only at runtime.

use flowdesk_core::{FlowdeskError, Plan};
use rusqlite::params;

use crate::database::Database;

fn row_to_plan(row: &rusqlite::Row<'_>) -> Result<Plan, rusqlite::Error> {
    Ok(Plan {
        id: row.get(0)?,
        name: row.get(1)?,
        max_messages: row.get(2)?,
        max_tokens: row.get(3)?,
        model: row.get(4)?,
        price_cents: row.get(5)?,
        allow_sdk: row.get(6)?,
        allow_telegram: row.get(7)?,
    })
}

const PLAN_COLUMNS: &str =
    "id, name, max_messages, max_tokens, model, price_cents, allow_sdk, allow_telegram";

/// Get a plan by ID.
pub async fn get_plan(db: &Database, id: &str) -> Result<Option<Plan>, FlowdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_plan);
            match result {
                Ok(plan) => Ok(Some(plan)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a plan by its unique name, e.g. `"free"`.
pub async fn get_plan_by_name(db: &Database, name: &str) -> Result<Option<Plan>, FlowdeskError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE name = ?1"))?;
            let result = stmt.query_row(params![name], row_to_plan);
            match result {
                Ok(plan) => Ok(Some(plan)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
