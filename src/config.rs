//! Environment-driven service configuration.

use std::collections::HashMap;
use thiserror::Error;

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the HTTP server binds.
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when a required variable is absent or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Resolve configuration from an explicit map. Tests use this instead
    /// of touching the process environment.
    pub fn from_env_map(env: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(&env, "PORT", 8080u16)?;
        let database_path = required(&env, "DATABASE_PATH")?;
        let jwt_secret = required(&env, "JWT_SECRET")?;

        let token_ttl_hours: i64 = parse_or(&env, "TOKEN_TTL_HOURS", 720)?;
        if token_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_TTL_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Config {
            port,
            database_path,
            jwt_secret,
            token_ttl_hours,
        })
    }
}

fn required(env: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env.get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_or<T: std::str::FromStr>(
    env: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("cannot parse {:?}", raw))
        }),
    }
}
