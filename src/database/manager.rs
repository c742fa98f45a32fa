use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::ConnectionSettings;

/// Errors from the persistence layer, already classified at the adapter boundary
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// Unique index violation. `field` is the column name, `value` the offending
    /// value when the driver reported it.
    #[error("Duplicate key on {field}")]
    DuplicateKey { field: String, value: Option<String> },

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

// Every driver error goes through the classifier so `?` never skips it
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        crate::database::postgres::classify(err)
    }
}

/// Owns the Postgres connection pool for the lifetime of the process
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Open the pool described by `settings`
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(&settings.url)
            .await?;

        info!("Created database pool for: {}", settings.database_name());
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Quote SQL identifier to prevent injection
    pub fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Table names are interpolated into SQL, so only [a-zA-Z0-9_] is accepted
    /// and the first character may not be a digit
    pub fn is_valid_table_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && name.len() <= 63
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_table_names() {
        assert!(DatabaseManager::is_valid_table_name("students"));
        assert!(DatabaseManager::is_valid_table_name("_students_2024"));
        assert!(!DatabaseManager::is_valid_table_name("2024_students"));
        assert!(!DatabaseManager::is_valid_table_name("students-archive"));
        assert!(!DatabaseManager::is_valid_table_name("students; DROP TABLE students"));
        assert!(!DatabaseManager::is_valid_table_name(""));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(DatabaseManager::quote_identifier("students"), "\"students\"");
        assert_eq!(DatabaseManager::quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
