//! Tasks API server
//!
//! HTTP backend for task CRUD with filtered, sorted listings and
//! subtask reconciliation, gated by a static API key.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use tasks_api::cli::{Cli, Command};
use tasks_api::config::{Config, ConfigLoader};
use tasks_api::db::Database;
use tasks_api::server::{self, ApiKeyGate, AppState};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber according to `--log`.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // If explicit config path given, set it as env var for ConfigLoader to pick up
    // SAFETY: This is safe at program startup before any other threads are spawned
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var("TASKS_API_CONFIG_PATH", config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;

    if let Some(path) = loader.config_path() {
        info!("Using config file {}", path.display());
    }

    // Override from CLI arguments
    let config = loader.config_mut();
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let config = loader.into_config();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Seed => run_seed(&config),
    }
}

/// Run the HTTP server until Ctrl-C.
async fn run_server(config: Config) -> Result<()> {
    config.validate()?;
    config.ensure_db_dir()?;

    info!("Starting Tasks API v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);

    let db = Arc::new(Database::open(&config.server.db_path)?);
    info!("Database initialized successfully");

    let gate = Arc::new(ApiKeyGate::from_config(&config.auth)?);
    info!(
        header = %config.auth.header,
        keys = config.auth.api_keys.len(),
        "API key gate enabled"
    );

    let state = AppState::new(db, gate);
    let handle = server::start_server(state, config.listen_addr()?).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.shutdown().await;

    Ok(())
}

/// Run the seed command
fn run_seed(config: &Config) -> Result<()> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;

    let inserted = db.seed_demo_tasks()?;
    if inserted == 0 {
        eprintln!("Database already contains tasks; nothing seeded.");
    } else {
        eprintln!(
            "Seeded {} demo tasks into {}",
            inserted,
            config.server.db_path.display()
        );
    }
    Ok(())
}
