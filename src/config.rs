//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 9000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub use_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_pool_size: 10,
            use_tls: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from the process environment (and `.env`, if present)
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let server = ServerConfig {
            host: parse_or("HOST", &var, defaults.server.host)?,
            port: parse_or("PORT", &var, defaults.server.port)?,
        };

        let max_pool_size = parse_or("DB_MAX_CONNECTIONS", &var, defaults.database.max_pool_size)?;
        if max_pool_size == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        // DATABASE_URL wins over the individual DB_* variables
        let database = match var("DATABASE_URL") {
            Some(database_url) => Self::parse_database_url(&database_url, max_pool_size)?,
            None => DatabaseConfig {
                host: var("DB_HOST").unwrap_or(defaults.database.host),
                port: parse_or("DB_PORT", &var, defaults.database.port)?,
                user: var("DB_USER").unwrap_or(defaults.database.user),
                password: var("DB_PASSWORD").unwrap_or_default(),
                database: var("DB_NAME").unwrap_or(defaults.database.database),
                max_pool_size,
                use_tls: var("DB_SSLMODE")
                    .map(|mode| requires_tls(&mode))
                    .unwrap_or(false),
            },
        };

        let cors = CorsConfig {
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors.allowed_origins),
        };

        Ok(Self {
            server,
            database,
            cors,
        })
    }

    /// Parse a DATABASE_URL connection string (postgres://...)
    fn parse_database_url(raw: &str, max_pool_size: usize) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(raw).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgres://...)".to_string(),
            )
        })?;

        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported DATABASE_URL scheme: {}",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "Missing database name in DATABASE_URL".to_string(),
            ));
        }

        let use_tls = parsed
            .query_pairs()
            .any(|(key, value)| key == "sslmode" && requires_tls(&value));

        Ok(DatabaseConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: decode_component(parsed.username(), "user")?,
            password: parsed
                .password()
                .map(|p| decode_component(p, "password"))
                .transpose()?
                .unwrap_or_default(),
            database,
            max_pool_size,
            use_tls,
        })
    }
}

/// URL userinfo arrives percent-encoded; the server expects the raw value
fn decode_component(raw: &str, what: &str) -> Result<String, ConfigError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ConfigError::InvalidValue(format!("DATABASE_URL {what} is not valid UTF-8")))
}

fn requires_tls(sslmode: &str) -> bool {
    matches!(sslmode, "require" | "verify-ca" | "verify-full")
}

fn parse_or<T, F>(key: &str, var: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{key}={raw}"))),
        None => Ok(default),
    }
}
