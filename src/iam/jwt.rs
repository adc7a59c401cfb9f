// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::User;
use crate::config::ValidatedConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

#[derive(Debug)]
pub enum JwtError {
    TokenCreationError(String),
    TokenVerificationError(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenCreationError(msg) => write!(f, "Token creation error: {}", msg),
            JwtError::TokenVerificationError(msg) => write!(f, "Token verification error: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

pub struct JwtService {
    secret: String,
    issuer: String,
    audience: String,
    expiration_hours: u64,
    cookie_name: String,
    is_localhost: bool,
}

impl JwtService {
    pub fn new(config: &ValidatedConfig) -> Self {
        JwtService {
            secret: config.jwt.secret.clone(),
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
            expiration_hours: config.jwt.expiration_hours,
            cookie_name: config.jwt.cookie_name.clone(),
            is_localhost: config.is_localhost_only(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Create a session token for a user.
    pub fn create_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours as i64);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| JwtError::TokenCreationError(e.to_string()))
    }

    /// Verify a session token and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| JwtError::TokenVerificationError(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Create a secure HTTP-only cookie carrying the session token.
    pub fn create_auth_cookie<'a>(&self, token: &str) -> actix_web::cookie::Cookie<'a> {
        let expiration = Utc::now() + Duration::hours(self.expiration_hours as i64);
        let expires = actix_web::cookie::time::OffsetDateTime::from_unix_timestamp(
            expiration.timestamp(),
        )
        .unwrap_or(actix_web::cookie::time::OffsetDateTime::UNIX_EPOCH);

        actix_web::cookie::Cookie::build(self.cookie_name.clone(), token.to_string())
            .path("/")
            .secure(!self.is_localhost) // Allow HTTP on localhost
            .http_only(true)
            .same_site(actix_web::cookie::SameSite::Lax)
            .expires(expires)
            .finish()
    }

    /// Create a cookie that removes the session token.
    pub fn create_logout_cookie<'a>(&self) -> actix_web::cookie::Cookie<'a> {
        actix_web::cookie::Cookie::build(self.cookie_name.clone(), "")
            .path("/")
            .secure(!self.is_localhost)
            .http_only(true)
            .same_site(actix_web::cookie::SameSite::Lax)
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .expires(actix_web::cookie::time::OffsetDateTime::UNIX_EPOCH)
            .finish()
    }
}
