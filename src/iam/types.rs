// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Public identity of an account. The todo service only ever consumes `id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A user row as persisted, including the credential hash. Never serialized.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug)]
pub enum IamError {
    EmailTaken,
    /// Covers both unknown email and wrong password, indistinguishably.
    InvalidCredentials,
    ValidationError(String),
    TokenError(String),
    Store(StoreError),
    Password(super::password::PasswordError),
}

impl std::fmt::Display for IamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IamError::EmailTaken => write!(f, "Email already registered"),
            IamError::InvalidCredentials => write!(f, "Invalid email or password"),
            IamError::ValidationError(msg) => write!(f, "{}", msg),
            IamError::TokenError(msg) => write!(f, "Token error: {}", msg),
            IamError::Store(err) => write!(f, "Store error: {}", err),
            IamError::Password(err) => write!(f, "Password error: {}", err),
        }
    }
}

impl std::error::Error for IamError {}

impl From<StoreError> for IamError {
    fn from(value: StoreError) -> Self {
        IamError::Store(value)
    }
}

impl From<super::password::PasswordError> for IamError {
    fn from(value: super::password::PasswordError) -> Self {
        IamError::Password(value)
    }
}
