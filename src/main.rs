//! Task board server
//!
//! Serves the task REST API over HTTP, backed by a local SQLite file.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use taskboard::api;
use taskboard::cli::{Cli, Command};
use taskboard::config::Config;
use taskboard::db::Database;
use taskboard::logging::{self, LogTarget};
use tracing::info;

/// Open the database, creating its directory and schema as needed.
fn open_database(config: &Config) -> Result<Database> {
    config.ensure_db_dir().with_context(|| {
        format!(
            "failed to create database directory for {}",
            config.server.db_path.display()
        )
    })?;
    let db = Database::open(&config.server.db_path).with_context(|| {
        format!(
            "failed to open database {}",
            config.server.db_path.display()
        )
    })?;
    info!("Using database {}", config.server.db_path.display());
    Ok(db)
}

async fn run_server(config: Config) -> Result<()> {
    // Schema must be usable before any traffic is accepted.
    let db = Arc::new(open_database(&config)?);

    let handle = api::start_server(db, &config.server).await?;
    info!(addr = %handle.local_addr(), "Server ready");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C, shutting down");
    handle.shutdown().await;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Init => {
            open_database(&config)?;
            info!("Database initialized");
        }
        Command::Serve => {
            run_server(config).await?;
        }
    }

    Ok(())
}
