pub mod entities;
pub mod migrator;
pub mod repositories;

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::shared::{DomainError, DomainResult};

/// Upper bound for a single storage call.
pub const DATABASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./blueprints.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./blueprints.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 5,
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }

    /// Private in-memory SQLite database.
    ///
    /// Pinned to one connection: every new SQLite memory connection would
    /// otherwise see its own empty database.
    pub fn sqlite_in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(DATABASE_TIMEOUT)
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

pub(crate) fn db_err(operation: &'static str, e: DbErr) -> DomainError {
    DomainError::storage(operation, e.to_string())
}

/// Runs one storage call under [`DATABASE_TIMEOUT`], keeping the driver
/// error for callers that need to inspect it.
///
/// Elapsed calls are dropped, which aborts the in-flight statement.
pub(crate) async fn timed<T, F>(operation: &'static str, call: F) -> DomainResult<Result<T, DbErr>>
where
    F: Future<Output = Result<T, DbErr>>,
{
    tokio::time::timeout(DATABASE_TIMEOUT, call)
        .await
        .map_err(|_| {
            DomainError::storage(
                operation,
                format!("timed out after {}s", DATABASE_TIMEOUT.as_secs()),
            )
        })
}

/// [`timed`] with driver errors wrapped as storage failures.
pub(crate) async fn bounded<T, F>(operation: &'static str, call: F) -> DomainResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    timed(operation, call)
        .await?
        .map_err(|e| db_err(operation, e))
}
