/// Main entry point for the Caveman Tracker MCP server
///
/// This file sets up logging, loads configuration, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use caveman_tracker::{Config, TrackerServer};

/// Find a writable directory for the database, trying the usual places in order
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".caveman_tracker")),
        dirs::data_dir().map(|p| p.join("caveman_tracker")),
        dirs::config_dir().map(|p| p.join("caveman_tracker")),
        std::env::current_dir()
            .ok()
            .map(|p| p.join(".caveman_tracker")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }
        let probe = dir.join(".test_write");
        if std::fs::write(&probe, "test").is_ok() {
            let _ = std::fs::remove_file(&probe);
            return Ok(dir.join("caveman.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("caveman_tracker");
    std::fs::create_dir_all(&temp_dir)?;
    let db_path = temp_dir.join("caveman.db");

    tracing::warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

/// Command line arguments for the Caveman Tracker MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// Overrides `database_path` from the config file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never contact the remote quote service
    #[arg(long)]
    offline: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("caveman_tracker={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    info!("Starting Caveman Tracker MCP server");

    let config = match args.config.or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let db_path = match args.database.or_else(|| config.database_path.clone()) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = TrackerServer::new(db_path, config, args.offline)?;

    // Handles JSON-RPC over stdin/stdout until the client disconnects
    server.run().await?;

    info!("Caveman Tracker MCP server shutdown complete");
    Ok(())
}
