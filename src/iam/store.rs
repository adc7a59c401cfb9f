// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use rusqlite::{ErrorCode, OptionalExtension, Row, params};

use super::types::{IamError, User, UserRecord};
use crate::store::{SqliteStore, StoreError, format_timestamp, timestamp_from_column};

pub trait UserStore: Send + Sync {
    fn insert_user(&self, record: &UserRecord) -> Result<(), IamError>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, IamError>;
    fn find_by_id(&self, id: &str) -> Result<Option<User>, IamError>;
}

impl UserStore for SqliteStore {
    fn insert_user(&self, record: &UserRecord) -> Result<(), IamError> {
        self.with_conn(|conn| {
            let insert = conn.execute(
                "INSERT INTO users(id, email, name, password_hash, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.user.id,
                    record.user.email,
                    record.user.name,
                    record.password_hash,
                    format_timestamp(&record.user.created_at),
                ],
            );
            match insert {
                Ok(_) => Ok(()),
                Err(err) => Err(map_insert_conflict(err)),
            }
        })
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, IamError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, name, password_hash, created_at \
                 FROM users WHERE email = ?1",
                params![email],
                record_from_row,
            )
            .optional()
            .map_err(|err| IamError::Store(StoreError::Sql(err)))
        })
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, IamError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        name: row.get(2)?,
                        created_at: timestamp_from_column(row, 3)?,
                    })
                },
            )
            .optional()
            .map_err(|err| IamError::Store(StoreError::Sql(err)))
        })
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        user: User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            created_at: timestamp_from_column(row, 4)?,
        },
        password_hash: row.get(3)?,
    })
}

fn map_insert_conflict(err: rusqlite::Error) -> IamError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err
        && failure.code == ErrorCode::ConstraintViolation
    {
        return IamError::EmailTaken;
    }
    IamError::Store(StoreError::Sql(err))
}
