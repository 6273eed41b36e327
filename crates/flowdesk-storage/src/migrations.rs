// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! The SQL files under `migrations/` are compiled in through refinery's
//! `embed_migrations!` and applied on open. Refinery records what already
//! ran in its `refinery_schema_history` table, so reopening a database is
//! a no-op until a new migration file ships.

use flowdesk_core::FlowdeskError;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply any migrations this database file has not seen yet.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), FlowdeskError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| FlowdeskError::Storage {
            source: Box::new(e),
        })?;
    let applied = report.applied_migrations().len();
    if applied > 0 {
        debug!(applied, "schema migrations applied");
    }
    Ok(())
}
