//! Configuration loading for the price board daemon.
//!
//! Loads configuration from TOML files and/or environment variables using figment.
//!
//! # Configuration Sources (in order of priority, lowest to highest)
//!
//! 1. Default values (from `#[serde(default)]` attributes)
//! 2. TOML config file (if provided)
//! 3. Environment variables (prefix: `GOLDENEYE_`, nested with `__`)
//!
//! # Environment Variable Naming
//!
//! - `GOLDENEYE_HTTP__LISTEN_ADDR` → `http.listen_addr`
//! - `GOLDENEYE_AUTH__ADMIN_PASSWORD` → `auth.admin_password`
//! - `GOLDENEYE_AUTH__MASTER_PASSWORD` → `auth.master_password`
//! - `GOLDENEYE_DATABASE__PATH` → `database.path`
//!
//! The `[auth]` passwords ship with well-known defaults so a fresh checkout
//! runs out of the box; production deployments must override them via the
//! config file or environment.

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the daemon.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub http: HttpConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Admin and master credentials
    pub auth: AuthConfig,

    /// Price display settings
    pub price: PriceConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Credentials for the admin panel.
///
/// The admin password is the starting value for each panel session; the
/// master password is a permanent override that always unlocks a password
/// reset and is never mutated at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Initial admin password for new panel sessions
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Master override password for password resets
    #[serde(default = "default_master_password")]
    pub master_password: String,

    /// Idle timeout for panel sessions, in seconds
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: default_admin_password(),
            master_password: default_master_password(),
            session_timeout_secs: default_session_timeout_secs(),
        }
    }
}

fn default_admin_password() -> String {
    "password123".to_string()
}

fn default_master_password() -> String {
    "gold123".to_string()
}

fn default_session_timeout_secs() -> u64 {
    3600
}

/// Price display configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceConfig {
    /// Price shown before any update has been stored (INR per 10 grams)
    #[serde(default = "default_price")]
    pub default_price: Decimal,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            default_price: default_price(),
        }
    }
}

fn default_price() -> Decimal {
    Decimal::new(72_500_00, 2)
}

/// SQLite database configuration (used when compiled with `sqlite` feature).
#[cfg(feature = "sqlite")]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    /// If not specified, defaults to `goldeneye.db` in the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// PostgreSQL database configuration (used when compiled with `postgres` feature).
#[cfg(feature = "postgres")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database host (default: "localhost")
    #[serde(default = "default_postgres_host")]
    pub host: String,

    /// Database port (default: 5432)
    #[serde(default = "default_postgres_port")]
    pub port: u16,

    /// Database user
    #[serde(default)]
    pub user: String,

    /// Database password
    #[serde(default)]
    pub password: String,

    /// Database name (default: "goldeneye")
    #[serde(default = "default_postgres_database")]
    pub database: String,
}

#[cfg(feature = "postgres")]
fn default_postgres_host() -> String {
    "localhost".to_string()
}

#[cfg(feature = "postgres")]
fn default_postgres_port() -> u16 {
    5432
}

#[cfg(feature = "postgres")]
fn default_postgres_database() -> String {
    "goldeneye".to_string()
}

#[cfg(feature = "postgres")]
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_postgres_host(),
            port: default_postgres_port(),
            user: String::new(),
            password: String::new(),
            database: default_postgres_database(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Configuration sources are merged in order (later sources override earlier):
    /// 1. TOML config file (if it exists)
    /// 2. Environment variables (prefix: `GOLDENEYE_`, nested with `__`)
    pub fn load(path: &Path) -> Result<Self> {
        let mut figment = Figment::new();

        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("GOLDENEYE_").split("__"));

        let config: Config = figment.extract().with_context(|| {
            format!(
                "Failed to load config from {} and environment",
                path.display()
            )
        })?;

        Ok(config)
    }

    /// Get the default config file path
    /// - macOS: ~/Library/Application Support/goldeneye/config.toml
    /// - Linux: ~/.config/goldeneye/config.toml
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("goldeneye")
            .join("config.toml")
    }

    /// Get the default data directory (database, logs)
    /// - macOS: ~/Library/Application Support/goldeneye/
    /// - Linux: ~/.local/share/goldeneye/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("goldeneye")
    }
}

/// Create a default configuration template
pub fn default_config_template() -> String {
    let data_dir = Config::default_data_dir();
    let data_dir_str = data_dir.display();

    format!(
        r#"# GoldenEye Configuration
# Data directory: {data_dir_str}

[http]
listen_addr = "0.0.0.0:8080"

# SQLite configuration (when compiled with --features sqlite, the default)
[database]
# path = "{data_dir_str}/goldeneye.db"  # Optional, defaults to data_dir/goldeneye.db

# PostgreSQL configuration (when compiled with --features postgres)
# [database]
# host = "localhost"
# port = 5432
# user = "goldeneye"
# password = "secret"
# database = "goldeneye"

[auth]
# Override both passwords in production. The admin password is the starting
# password for each panel session; the master password always unlocks a
# password reset and never changes at runtime.
admin_password = "password123"
master_password = "gold123"
session_timeout_secs = 3600

[price]
# Shown until the first stored update (INR per 10 grams)
default_price = 72500.00
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Toml as TomlProvider;

    /// Helper to parse TOML config strings in tests
    fn parse_config(toml_str: &str) -> Config {
        Figment::new()
            .merge(TomlProvider::string(toml_str))
            .extract()
            .expect("Failed to parse test config")
    }

    #[test]
    fn test_defaults() {
        let config = parse_config("");
        assert_eq!(config.http.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.auth.admin_password, "password123");
        assert_eq!(config.auth.master_password, "gold123");
        assert_eq!(config.auth.session_timeout_secs, 3600);
        assert_eq!(config.price.default_price, Decimal::new(72_500_00, 2));
    }

    #[test]
    fn test_parse_config() {
        let config_str = r#"
[http]
listen_addr = "127.0.0.1:9000"

[auth]
admin_password = "hunter22"
master_password = "override99"
session_timeout_secs = 600

[price]
default_price = 80000.00
"#;

        let config = parse_config(config_str);
        assert_eq!(config.http.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.auth.admin_password, "hunter22");
        assert_eq!(config.auth.master_password, "override99");
        assert_eq!(config.auth.session_timeout_secs, 600);
        assert_eq!(config.price.default_price, Decimal::new(80_000_00, 2));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[auth]\nmaster_password = \"changed\"\n");
        assert_eq!(config.auth.master_password, "changed");
        assert_eq!(config.auth.admin_password, "password123");
        assert_eq!(config.http.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_config_template_parses() {
        let config = parse_config(&default_config_template());
        assert_eq!(config.auth.admin_password, "password123");
    }
}
