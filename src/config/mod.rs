use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::database::DatabaseManager;

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
    /// Connection string (DATABASE_URL or DB_CONN_STRING)
    pub url: Option<String>,
    /// Database name overriding the path of `url` (DB_NAME)
    pub name: Option<String>,
    pub table_name: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub enable_seed_route: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: DATABASE_URL (or DB_CONN_STRING)")]
    MissingDatabaseUrl,

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Invalid students table name: {0}")]
    InvalidTableName(String),
}

/// Validated parameters for opening the Postgres pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub url: String,
    pub table_name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

impl ConnectionSettings {
    /// Database name from the URL path, for logging
    pub fn database_name(&self) -> &str {
        self.url
            .split('?')
            .next()
            .and_then(|base| base.rsplit('/').next())
            .unwrap_or_default()
    }
}

impl DatabaseConfig {
    /// Resolve and validate the connection parameters
    pub fn connection_settings(&self) -> Result<ConnectionSettings, ConfigError> {
        let base = self.url.as_deref().ok_or(ConfigError::MissingDatabaseUrl)?;
        let mut url =
            url::Url::parse(base).map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()))?;

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            url.set_path(&format!("/{}", name));
        }

        if !DatabaseManager::is_valid_table_name(&self.table_name) {
            return Err(ConfigError::InvalidTableName(self.table_name.clone()));
        }

        Ok(ConnectionSettings {
            url: url.into(),
            table_name: self.table_name.clone(),
            max_connections: self.max_connections,
            connection_timeout: self.connection_timeout,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable source (the process environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Connection parameters
        self.database.url = lookup("DATABASE_URL").or_else(|| lookup("DB_CONN_STRING"));
        self.database.name = lookup("DB_NAME");
        if let Some(v) = lookup("STUDENTS_TABLE_NAME").or_else(|| lookup("STUDENTS_COLLECTION_NAME")) {
            self.database.table_name = v;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = lookup("API_ENABLE_SEED_ROUTE") {
            self.api.enable_seed_route = v.parse().unwrap_or(self.api.enable_seed_route);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                name: None,
                table_name: "students".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                enable_seed_route: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                name: None,
                table_name: "students".to_string(),
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                enable_seed_route: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                name: None,
                table_name: "students".to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                enable_seed_route: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}
