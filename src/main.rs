//! GoldenEye - Main entry point
//!
//! A small gold price board: a public page showing the current price, a JSON
//! settings API, and an admin panel for updating the price and managing the
//! admin password.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use goldeneye::admin::AdminState;
use goldeneye::config::{self, Config};
use goldeneye::db::Database;
use goldeneye::server::{run_server, ServerConfig};
use goldeneye::session::SessionRegistry;
use goldeneye::settings::SettingsStore;

/// GoldenEye - Gold price board with a self-service admin panel
#[derive(Parser)]
#[command(name = "goldeneye")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Data directory for the database and logs
    #[arg(short, long, default_value_os_t = Config::default_data_dir())]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the price board daemon
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Generate a default configuration file
    InitConfig {
        /// Output path (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    match cli.command {
        Commands::Serve { listen } => {
            // Daemon mode: log to both stdout and a rotating file
            init_daemon_logging(&cli.data_dir, filter)?;
            serve(&cli.config, &cli.data_dir, listen).await
        }
        Commands::InitConfig { output } => {
            init_cli_logging(filter);
            generate_config(output)
        }
    }
}

/// Initialize logging for CLI commands (stdout only).
fn init_cli_logging(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Initialize logging for daemon mode (stdout + rotating file).
fn init_daemon_logging(data_dir: &PathBuf, filter: EnvFilter) -> Result<()> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("goldeneye")
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| "Failed to create log file appender")?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the lifetime of the daemon
    std::mem::forget(_guard);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false)) // stdout
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking),
        ) // file
        .init();

    info!("Logging to: {}", log_dir.display());
    Ok(())
}

/// Run the price board daemon
async fn serve(
    config_path: &PathBuf,
    data_dir: &PathBuf,
    listen_override: Option<SocketAddr>,
) -> Result<()> {
    ensure_data_dir(data_dir)?;

    let config = Config::load(config_path)?;

    let listen_addr: SocketAddr = match listen_override {
        Some(addr) => addr,
        None => config
            .http
            .listen_addr
            .parse()
            .context("Invalid listen address in config")?,
    };

    let db = Database::new(&config.database, data_dir).await?;
    let settings = Arc::new(SettingsStore::new(db.pool()));

    let state = Arc::new(AdminState {
        sessions: SessionRegistry::new(),
        settings,
        auth: config.auth.clone(),
        default_price: config.price.default_price,
    });

    info!("GoldenEye starting...");

    // Sweep idle panel sessions in the background
    let cleanup_state = state.clone();
    let session_timeout = Duration::from_secs(config.auth.session_timeout_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));

        loop {
            ticker.tick().await;
            let removed = cleanup_state.sessions.remove_stale(session_timeout).await;
            if !removed.is_empty() {
                debug!("Removed {} idle panel session(s)", removed.len());
            }
        }
    });

    let server_config = ServerConfig { listen_addr };
    run_server(server_config, state).await
}

/// Ensure data directory exists
fn ensure_data_dir(data_dir: &PathBuf) -> Result<()> {
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        info!("Created data directory: {}", data_dir.display());
    }
    Ok(())
}

/// Generate a default configuration file
fn generate_config(output: Option<PathBuf>) -> Result<()> {
    let config = config::default_config_template();

    match output {
        Some(path) => {
            std::fs::write(&path, &config)?;
            println!("Configuration written to: {}", path.display());
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}
