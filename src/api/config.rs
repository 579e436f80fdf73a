//! Server configuration read from the environment.

use log::debug;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    #[error("{name} has an invalid value '{value}'")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind, `TASKFLOW_BIND`.
    pub bind_address: String,
    /// HMAC secret for bearer tokens, `JWT_SECRET`.
    pub jwt_secret: String,
    /// `PostgreSQL` URL, `DATABASE_URL`; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Allowed CORS origin, `FRONTEND_ORIGIN`.
    pub frontend_origin: String,
    /// JSON file of directory records, `TASKFLOW_DIRECTORY_FILE`.
    pub directory_seed: Option<PathBuf>,
    /// Lifetime of issued tokens in hours, `TASKFLOW_TOKEN_TTL_HOURS`.
    pub token_ttl_hours: i64,
}

impl ServerConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            debug!("no .env file loaded: {err}");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = read("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let token_ttl_hours = match read("TASKFLOW_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::Invalid {
                    name: "TASKFLOW_TOKEN_TTL_HOURS",
                    value: raw,
                })?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        Ok(Self {
            bind_address: read("TASKFLOW_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            jwt_secret,
            database_url: read("DATABASE_URL"),
            frontend_origin: read("FRONTEND_ORIGIN")
                .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_owned()),
            directory_seed: read("TASKFLOW_DIRECTORY_FILE").map(PathBuf::from),
            token_ttl_hours,
        })
    }
}
