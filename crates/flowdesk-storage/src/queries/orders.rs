// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submitted order operations.

use flowdesk_core::{FlowdeskError, OrderRecord, OrderStatus};
use rusqlite::params;

use crate::database::Database;

fn row_to_order(row: &rusqlite::Row<'_>) -> Result<OrderRecord, rusqlite::Error> {
    let status: String = row.get(8)?;
    Ok(OrderRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service: row.get(2)?,
        industry: row.get(3)?,
        host_duration: row.get(4)?,
        workflow_name: row.get(5)?,
        workflow_details: row.get(6)?,
        attachment_name: row.get(7)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?,
        total_cents: row.get(9)?,
        created_at: row.get(10)?,
    })
}

const ORDER_COLUMNS: &str = "id, user_id, service, industry, host_duration, workflow_name, \
                             workflow_details, attachment_name, status, total_cents, created_at";

/// Insert a confirmed order.
pub async fn insert_order(db: &Database, order: &OrderRecord) -> Result<(), FlowdeskError> {
    let order = order.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders (id, user_id, service, industry, host_duration,
                                     workflow_name, workflow_details, attachment_name,
                                     status, total_cents, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    order.id,
                    order.user_id,
                    order.service,
                    order.industry,
                    order.host_duration,
                    order.workflow_name,
                    order.workflow_details,
                    order.attachment_name,
                    order.status.to_string(),
                    order.total_cents,
                    order.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an order by ID.
pub async fn get_order(db: &Database, id: &str) -> Result<Option<OrderRecord>, FlowdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_order);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update an order's status, returning the updated row if the order exists.
pub async fn update_order_status(
    db: &Database,
    id: &str,
    status: OrderStatus,
) -> Result<Option<OrderRecord>, FlowdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE orders SET status = ?2 WHERE id = ?1",
                params![id, status.to_string()],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
            ))?;
            let order = stmt.query_row(params![id], row_to_order)?;
            Ok(Some(order))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
