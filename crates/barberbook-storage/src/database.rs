// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: PRAGMA setup, migrations and the shared background
//! connection.
//!
//! Every query goes through the single `tokio-rusqlite` worker thread, which
//! serializes writes. Do not open extra connections for writing.

use std::path::Path;

use barberbook_core::BarberError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BarberError {
    BarberError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open in WAL mode, creating the file and applying migrations as needed.
    pub async fn open(path: &str) -> Result<Self, BarberError> {
        Self::open_with(path, true).await
    }

    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, BarberError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(BarberError::storage)?;
        }

        // Migrations run on a short-lived blocking connection before the
        // shared worker starts.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), BarberError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(BarberError::storage)?;
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update_and_check(None, "journal_mode", journal, |row| {
                row.get::<_, String>(0)
            })
            .map_err(BarberError::storage)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| BarberError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| BarberError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checkpoint the WAL into the main file.
    pub async fn checkpoint(&self) -> Result<(), BarberError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and shut the worker down.
    pub async fn close(self) -> Result<(), BarberError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| BarberError::Storage {
            source: Box::new(e),
        })?;
        debug!(path = %self.path, "database closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/bb.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();

        for table in ["chats", "chat_messages", "offers", "offer_redemptions", "vault_meta"] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bb.db");
        let path = path.to_str().unwrap();

        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open(path).await.unwrap();
        assert_eq!(db.path(), path);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("fk.db").to_str().unwrap())
            .await
            .unwrap();

        let result = db
            .connection()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO chat_messages (id, chat_id, sender_id, sender_name, content, timestamp)
                     VALUES ('m1', 'no-such-chat', 'u', 'U', 'hi', '2024-01-01')",
                    [],
                )
            })
            .await;
        assert!(result.is_err());
    }
}
