use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, DatabaseConfig};

/// Postgres error codes we translate into API-level errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Duplicate row: {0}")]
    UniqueViolation(String),

    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return DatabaseError::UniqueViolation(db_err.message().to_string())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DatabaseError::MissingReference(db_err.message().to_string())
                }
                _ => {}
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Open the shared connection pool.
///
/// The pool is created once at startup and handed to every service; it is
/// the only shared mutable resource in the server.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await?;

    if config.uses_socket() {
        info!("Connected to database '{}' via unix socket", config.name);
    } else {
        info!("Connected to database '{}' on {}", config.name, config.host);
    }

    Ok(pool)
}

/// Pool that only dials the database on first use.
///
/// Lets the router come up (and reject unauthenticated traffic) before the
/// database is reachable.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let options = config.connect_options()?;
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(options))
}

/// Apply the embedded schema migrations
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
