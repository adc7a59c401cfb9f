// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod error;

pub use error::StoreError;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite-backed relational store shared by the identity and todo layers.
///
/// A single connection guarded by a mutex; every multi-step mutation runs
/// inside one transaction obtained through [`SqliteStore::with_conn`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by the test harness and unit tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        install_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T, E>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = self.lock_conn();
        f(&mut guard)
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Store connection lock poisoned; recovering");
                self.conn.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

/// Timestamps are stored as fixed-width RFC 3339 text (micros, UTC), so
/// lexicographic `ORDER BY` matches chronological order.
pub fn format_timestamp(value: &chrono::DateTime<chrono::Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn timestamp_from_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let raw: String = row.get(idx)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|value| value.with_timezone(&chrono::Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            name          TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            description TEXT,
            completed   INTEGER NOT NULL DEFAULT 0,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            color      TEXT NOT NULL DEFAULT '#3b82f6',
            owner_id   TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_categories (
            task_id     INTEGER NOT NULL REFERENCES tasks(id),
            category_id INTEGER NOT NULL REFERENCES categories(id),
            PRIMARY KEY (task_id, category_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id);
        CREATE INDEX IF NOT EXISTS idx_categories_owner ON categories(owner_id);
        CREATE INDEX IF NOT EXISTS idx_task_categories_category
            ON task_categories(category_id);
        "#,
    )?;
    Ok(())
}
