//! SeaORM-based database implementation
//!
//! This module provides database-agnostic access using SeaORM with support for:
//! - SQLite (the default, file-backed or in-memory)
//! - PostgreSQL
//! - MySQL

use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaOrmDatabase, DatabaseBackend,
    DatabaseConnection,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

pub mod migrations;
pub mod repositories;

/// Database connection manager with multi-database support
#[derive(Clone)]
pub struct Database {
    pub connection: Arc<DatabaseConnection>,
    pub backend: DatabaseBackend,
    pub database_type: DatabaseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
    PostgreSQL,
    MySQL,
}

impl Database {
    /// Create a new database connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_type = Self::detect_database_type(&config.url)?;

        info!("Connecting to {} database", database_type.as_str());

        // For SQLite, modify URL to enable auto-creation if needed
        let connection_url = match database_type {
            DatabaseType::SQLite => Self::ensure_sqlite_auto_creation(&config.url)?,
            _ => config.url.clone(),
        };

        let mut connect_options = ConnectOptions::new(&connection_url);
        connect_options
            .max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5)) // Fast fail for offline database
            .acquire_timeout(Duration::from_secs(3)) // Fast fail for pool exhaustion
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));

        Self::connect(connect_options, database_type, &config.url).await
    }

    /// Create an isolated in-memory SQLite database.
    ///
    /// Every pooled connection to `sqlite::memory:` opens its own empty
    /// database, so the pool is pinned to a single connection.
    pub async fn new_in_memory() -> Result<Self> {
        let mut connect_options = ConnectOptions::new("sqlite::memory:");
        connect_options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        Self::connect(connect_options, DatabaseType::SQLite, "sqlite::memory:").await
    }

    async fn connect(
        options: ConnectOptions,
        database_type: DatabaseType,
        display_url: &str,
    ) -> Result<Self> {
        let connection = match SeaOrmDatabase::connect(options).await {
            Ok(conn) => conn,
            Err(e) => {
                // Log the full error chain for debugging
                tracing::error!("Database connection failed: {:?}", e);
                let mut source = e.source();
                let mut level = 0;
                while let Some(err) = source {
                    tracing::error!("  Level {}: {}", level, err);
                    source = err.source();
                    level += 1;
                }
                return Err(anyhow::anyhow!(
                    "Failed to connect to database at '{}': {}",
                    display_url,
                    e
                ));
            }
        };

        debug!("Database connection established successfully");

        Ok(Self {
            backend: connection.get_database_backend(),
            connection: Arc::new(connection),
            database_type,
        })
    }

    /// Detect the database type from the URL
    fn detect_database_type(url: &str) -> Result<DatabaseType> {
        if url.starts_with("sqlite:") {
            Ok(DatabaseType::SQLite)
        } else if url.starts_with("postgres:") || url.starts_with("postgresql:") {
            Ok(DatabaseType::PostgreSQL)
        } else if url.starts_with("mysql:") {
            Ok(DatabaseType::MySQL)
        } else {
            anyhow::bail!("Unsupported database URL format: {}", url);
        }
    }

    /// Ensure SQLite URL includes auto-creation mode if needed
    fn ensure_sqlite_auto_creation(url: &str) -> Result<String> {
        // Fast path: if URL already has mode parameter or is in-memory, use as-is
        if url.contains("mode=") || url.contains(":memory:") {
            debug!("SQLite URL needs no modification: {}", url);
            return Ok(url.to_string());
        }

        let file_path = if let Some(path) = url.strip_prefix("sqlite://") {
            path
        } else if let Some(path) = url.strip_prefix("sqlite:") {
            path
        } else {
            anyhow::bail!("Invalid SQLite URL format: {}", url);
        };
        let file_path = file_path.split('?').next().unwrap_or(file_path);

        let path = std::path::Path::new(file_path);
        if path.exists() {
            debug!("SQLite database file already exists: {}", file_path);
            return Ok(url.to_string());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create directory for SQLite database: {}",
                        parent.display()
                    )
                })?;
                info!("Created directory for SQLite database: {}", parent.display());
            }
        }

        let auto_create_url = if url.contains('?') {
            format!("{}&mode=rwc", url)
        } else {
            format!("{}?mode=rwc", url)
        };

        info!(
            "Modified SQLite URL to enable auto-creation: {} -> {}",
            url, auto_create_url
        );
        Ok(auto_create_url)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        use migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        info!(
            "Running database migrations for {}",
            self.database_type.as_str()
        );

        Migrator::up(&*self.connection, None)
            .await
            .context("Failed to run migrations")?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database connection
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.connection.clone()
    }

    /// Get the database backend type
    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// Get the database type
    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> Result<(), sea_orm::DbErr> {
        self.connection.ping().await
    }
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::SQLite => "SQLite",
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
