use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::filter::FilterError;

/// Errors from the storage layer and the repositories built on it.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A foreign key, check or not-null constraint rejected the values.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Row decode error: {0}")]
    Decode(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.code().as_deref() {
                // unique_violation
                Some("23505") => return DatabaseError::Conflict(db.message().to_string()),
                // not_null, foreign_key, check, numeric out of range
                Some("23502") | Some("23503") | Some("23514") | Some("22003") => {
                    return DatabaseError::Constraint(db.message().to_string())
                }
                _ => {}
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Builds the PostgreSQL pool from configuration.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let database_name = config.database_name();
        let connection_string = Self::database_url(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Created database pool for: {}", database_name);
        Ok(pool)
    }

    pub fn database_url(config: &AppConfig) -> Result<String, DatabaseError> {
        let base = config
            .database
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::build_connection_string(base, config.database_name())
    }

    /// Swaps the path of `base` for `database_name`, keeping credentials and query.
    fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }
}
