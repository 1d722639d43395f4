use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default upload ceiling: 5MB per image.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted `API_MAX_UPLOAD_BYTES`.
pub const MAX_UPLOAD_BYTES_LIMIT: usize = 100 * 1024 * 1024;

/// Longest accepted session lifetime: one year.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set. Check your .env file")]
    MissingJwtSecret,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub port: Option<u16>,
    pub socket_path: Option<PathBuf>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub feed_max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// Fails when `JWT_SECRET` is missing; the server must not start with an
    /// unsigned or guessable token secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let base = match environment {
            Environment::Production => Self::production(secret),
            Environment::Staging => Self::staging(secret),
            Environment::Development => Self::development(secret),
        };

        base.with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = Some(parse("DB_PORT", &v)?);
        }
        if let Some(v) = lookup("DB_SOCKET_PATH").filter(|v| !v.is_empty()) {
            self.database.socket_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // API overrides
        if let Some(v) = lookup("PORT") {
            self.api.port = parse("PORT", &v)?;
        }
        if let Some(v) = lookup("UPLOAD_DIR").filter(|v| !v.is_empty()) {
            self.api.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("API_MAX_UPLOAD_BYTES") {
            self.api.max_upload_bytes = parse_in_range("API_MAX_UPLOAD_BYTES", &v, 1..=MAX_UPLOAD_BYTES_LIMIT)?;
        }
        if let Some(v) = lookup("API_FEED_MAX_LIMIT") {
            self.api.feed_max_limit = parse("API_FEED_MAX_LIMIT", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = parse_in_range("SECURITY_JWT_EXPIRY_HOURS", &v, 1..=MAX_JWT_EXPIRY_HOURS)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn development(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::defaults(10, 30),
            api: ApiConfig::defaults(),
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }

    fn staging(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig::defaults(10, 10),
            api: ApiConfig::defaults(),
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production(jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::defaults(20, 5),
            api: ApiConfig::defaults(),
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

impl DatabaseConfig {
    fn defaults(max_connections: u32, connection_timeout: u64) -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            name: "schedule_db".to_string(),
            port: None,
            socket_path: None,
            max_connections,
            connection_timeout,
        }
    }

    /// Whether connections should go through the unix socket instead of TCP.
    ///
    /// Only for `localhost` without an explicit port.
    pub fn uses_socket(&self) -> bool {
        self.url.is_none()
            && self.host == "localhost"
            && self.port.is_none()
            && self.socket_path.is_some()
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.user)
            .database(&self.name);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if self.uses_socket() {
            if let Some(socket) = &self.socket_path {
                options = options.socket(socket);
            }
        }

        Ok(options)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl ApiConfig {
    fn defaults() -> Self {
        Self {
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            feed_max_limit: 100,
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_in_range<T>(key: &'static str, value: &str, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd,
{
    let parsed = parse(key, value)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
    }
}
