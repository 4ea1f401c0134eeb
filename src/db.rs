//! Database management for the price board.
//!
//! Provides the connection pool backing the settings store.
//!
//! The database backend is selected at compile time via feature flags:
//! - `sqlite` (default): Uses SQLite
//! - `postgres`: Uses PostgreSQL

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
#[cfg(feature = "sqlite")]
use std::str::FromStr;

#[cfg(feature = "postgres")]
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

// Re-export the pool and row types for the selected backend
#[cfg(feature = "sqlite")]
pub use sqlx::{sqlite::SqliteRow as DbRow, SqlitePool as DbPool};

#[cfg(feature = "postgres")]
pub use sqlx::{postgres::PgRow as DbRow, PgPool as DbPool};

/// Shared database for the daemon.
///
/// Owns the connection pool and runs migrations. Created once at startup;
/// components receive clones of the pool.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection based on configuration.
    ///
    /// Connects (creating the SQLite file if needed), runs all pending
    /// migrations, and returns a pool ready for use.
    #[cfg(feature = "sqlite")]
    pub async fn new(config: &DatabaseConfig, data_dir: &Path) -> Result<Self> {
        use std::fs;

        let db_path = config
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join("goldeneye.db"));

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        sqlx::migrate!("./migrations/shared")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        info!(backend = "sqlite", path = %db_path.display(), "Database connected");

        Ok(Self { pool })
    }

    /// Create a new database connection based on configuration.
    #[cfg(feature = "postgres")]
    pub async fn new(config: &DatabaseConfig, _data_dir: &Path) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to connect to PostgreSQL database")?;

        sqlx::migrate!("./migrations/shared")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        info!(
            backend = "postgres",
            host = %config.host,
            port = config.port,
            user = %config.user,
            database = %config.database,
            "Database connected"
        );

        Ok(Self { pool })
    }

    /// Get a clone of the connection pool.
    ///
    /// The pool is cheap to clone (internally Arc-based).
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
