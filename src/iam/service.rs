// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::JwtService;
use super::password::{hash_password, verify_password};
use super::store::UserStore;
use super::types::{IamError, User, UserRecord};
use crate::config::{Argon2Params, ValidatedConfig};

const MIN_PASSWORD_LEN: usize = 8;

/// Identity service: registration, login, session lookup.
pub struct IamService {
    store: Arc<dyn UserStore>,
    jwt: JwtService,
    password_params: Argon2Params,
}

impl IamService {
    pub fn new(config: &ValidatedConfig, store: Arc<dyn UserStore>) -> Self {
        IamService {
            store,
            jwt: JwtService::new(config),
            password_params: config.password.clone(),
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Register a new account and issue a session token for it.
    pub fn register(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<(User, String), IamError> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(IamError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            // Default display name: the local part of the email.
            _ => email.split('@').next().unwrap_or(&email).to_string(),
        };

        let record = UserRecord {
            user: User {
                id: Uuid::new_v4().to_string(),
                email,
                name,
                created_at: Utc::now(),
            },
            password_hash: hash_password(password, &self.password_params)?,
        };
        self.store.insert_user(&record)?;
        log::info!("Registered user {}", record.user.id);

        let token = self
            .jwt
            .create_token(&record.user)
            .map_err(|e| IamError::TokenError(e.to_string()))?;
        Ok((record.user, token))
    }

    /// Validate credentials and issue a session token. Unknown email and
    /// wrong password both surface as `InvalidCredentials`.
    pub fn login(&self, email: &str, password: &str) -> Result<(User, String), IamError> {
        let email = normalize_email(email)?;
        let Some(record) = self.store.find_by_email(&email)? else {
            return Err(IamError::InvalidCredentials);
        };

        if !verify_password(password, &record.password_hash)? {
            return Err(IamError::InvalidCredentials);
        }

        let token = self
            .jwt
            .create_token(&record.user)
            .map_err(|e| IamError::TokenError(e.to_string()))?;
        Ok((record.user, token))
    }

    /// Resolve a session token to a live user, confirming the account still
    /// exists.
    pub fn validate_session(&self, token: &str) -> Option<(User, super::jwt::Claims)> {
        let claims = self.jwt.verify_token(token).ok()?;
        match self.store.find_by_id(&claims.sub) {
            Ok(Some(user)) => Some((user, claims)),
            Ok(None) => None,
            Err(err) => {
                log::error!("Session lookup failed for user {}: {}", claims.sub, err);
                None
            }
        }
    }
}

fn normalize_email(email: &str) -> Result<String, IamError> {
    let email = email.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(IamError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(email)
}
