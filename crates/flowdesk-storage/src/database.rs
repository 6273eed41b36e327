// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management.
//!
//! One `tokio_rusqlite` connection per database file. All access funnels
//! through a single background thread, which serializes writes without an
//! explicit lock.

use std::path::Path;

use flowdesk_core::FlowdeskError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Handle to an open SQLite database.
///
/// Cheap to clone is not a goal here; share it behind the storage adapter.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and run pending
    /// migrations.
    ///
    /// With `wal_mode` the database uses a write-ahead log, which keeps
    /// readers unblocked during writes. Parent directories are created.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, FlowdeskError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| FlowdeskError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode={journal};\n\
             PRAGMA synchronous=NORMAL;\n\
             PRAGMA foreign_keys=ON;\n\
             PRAGMA busy_timeout=5000;"
        );
        conn.call(move |conn| {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| Ok(crate::migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        debug!(path, journal, "database open, migrations applied");
        Ok(Self { conn })
    }

    /// The underlying connection, for use by the query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), FlowdeskError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        Ok(())
    }
}

/// Convert a `tokio_rusqlite` error into the crate-level storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> FlowdeskError {
    FlowdeskError::Storage {
        source: Box::new(e),
    }
}
