// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::Argon2Params;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Debug)]
pub enum PasswordError {
    HashError(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::HashError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a password with Argon2id into the PHC string format.
pub fn hash_password(password: &str, params: &Argon2Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = build_argon2(params)?;
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| PasswordError::HashError(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash. The hash string carries its
/// own params, so verification works across param changes.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| PasswordError::HashError(err.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

fn build_argon2(params: &Argon2Params) -> Result<Argon2<'static>, PasswordError> {
    let argon2_params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
        .map_err(|err| PasswordError::HashError(err.to_string()))?;
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        argon2_params,
    ))
}
