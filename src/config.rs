// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    ReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Read error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            name: default_app_name(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: Argon2ParamsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JwtConfig {
    /// Empty means "generate an ephemeral secret at startup".
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,
    #[serde(default = "default_jwt_audience")]
    pub audience: String,
    #[serde(default = "default_jwt_expiration_hours")]
    pub expiration_hours: u64,
    #[serde(default = "default_jwt_cookie_name")]
    pub cookie_name: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            secret: String::new(),
            issuer: default_jwt_issuer(),
            audience: default_jwt_audience(),
            expiration_hours: default_jwt_expiration_hours(),
            cookie_name: default_jwt_cookie_name(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Argon2ParamsConfig {
    #[serde(default)]
    pub memory_kib: Option<u32>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub parallelism: Option<u32>,
}

fn default_app_name() -> String {
    "tido".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("tido.db")
}

fn default_jwt_issuer() -> String {
    "tido".to_string()
}

fn default_jwt_audience() -> String {
    "tido-users".to_string()
}

fn default_jwt_expiration_hours() -> u64 {
    12
}

fn default_jwt_cookie_name() -> String {
    "tido_auth".to_string()
}

pub const DEFAULT_ARGON2_PARAMS: Argon2Params = Argon2Params {
    memory_kib: 65536,
    iterations: 2,
    parallelism: 1,
};

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn resolve(config: &Argon2ParamsConfig) -> Result<Self, ConfigError> {
        let resolved = Argon2Params {
            memory_kib: config.memory_kib.unwrap_or(DEFAULT_ARGON2_PARAMS.memory_kib),
            iterations: config.iterations.unwrap_or(DEFAULT_ARGON2_PARAMS.iterations),
            parallelism: config.parallelism.unwrap_or(DEFAULT_ARGON2_PARAMS.parallelism),
        };

        if resolved.memory_kib == 0 || resolved.iterations == 0 || resolved.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "Argon2id params must be non-zero".to_string(),
            ));
        }

        Ok(resolved)
    }
}

/// Configuration after validation; the only form the rest of the app sees.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub app_name: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: Argon2Params,
}

impl ValidatedConfig {
    /// Cookies drop the `secure` flag only when the server binds to loopback.
    pub fn is_localhost_only(&self) -> bool {
        matches!(
            self.server.bind_address.as_str(),
            "127.0.0.1" | "::1" | "localhost"
        )
    }
}

impl Config {
    /// Load the config file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            log::info!("Config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ReadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.bind_address must not be empty".to_string(),
            ));
        }

        let mut jwt = self.auth.jwt;
        if jwt.secret.is_empty() {
            log::warn!(
                "auth.jwt.secret not configured; generating an ephemeral secret \
                 (sessions will not survive a restart)"
            );
            jwt.secret = format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        } else if jwt.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "auth.jwt.secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }
        if jwt.expiration_hours == 0 {
            return Err(ConfigError::ValidationError(
                "auth.jwt.expiration_hours must be non-zero".to_string(),
            ));
        }
        if jwt.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt.cookie_name must not be empty".to_string(),
            ));
        }

        let password = Argon2Params::resolve(&self.auth.password)?;

        Ok(ValidatedConfig {
            app_name: self.app.name,
            server: self.server,
            database: self.database,
            jwt,
            password,
        })
    }
}
