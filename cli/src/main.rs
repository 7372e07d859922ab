//! db-blueprints — CLI Server
//!
//! Headless Users/Products REST server.
//!
//! ```sh
//! # Run with default config (~/.config/db-blueprints/config.toml)
//! blueprints-server
//!
//! # Custom config path, port and database
//! blueprints-server --config ./config.toml --port 8081 --database-url sqlite://./dev.db?mode=rwc
//!
//! # Throwaway in-memory storage
//! blueprints-server --memory
//!
//! # Validate config without starting
//! blueprints-server --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use db_blueprints::config::{load_dotenv, AppConfig, StorageBackend};
use db_blueprints::server::{init_tracing, ServerHandle, ServerOptions};

/// db-blueprints: Users and Products CRUD over SQLite or memory.
#[derive(Parser, Debug)]
#[command(
    name = "blueprints-server",
    version,
    about = "Users and Products REST API server",
    long_about = "db-blueprints REST API server with search, sorting and pagination.\n\n\
                  Default config: ~/.config/db-blueprints/config.toml\n\
                  Environment overrides: HTTP_PORT, DATABASE_URL, LOG_LEVEL (a .env file is read)"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "APP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database connection URL.
    #[arg(long, conflicts_with = "memory")]
    database_url: Option<String>,

    /// Keep all data in process memory instead of a database.
    #[arg(long)]
    memory: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip applying the database schema on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let dotenv_path = load_dotenv();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(db_blueprints::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment: {}", e);
        std::process::exit(2);
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = Some(url.clone());
        config.database.backend = StorageBackend::Database;
    }
    if cli.memory {
        config.database.backend = StorageBackend::Memory;
    }

    // Tracing goes up once the final log level is known.
    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            warn!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }
    if let Some(path) = dotenv_path {
        info!("Environment loaded from {}", path.display());
    }

    if cli.init_config {
        config.save(&config_path)?;
        println!("Configuration written to {}", config_path.display());
        return Ok(());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            error!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        match config.database.backend {
            StorageBackend::Memory => println!("   Storage     : in-memory"),
            StorageBackend::Database => {
                println!("   Storage     : {}", config.database.connection_url())
            }
        }
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
