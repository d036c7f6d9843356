//! CLI command definitions for taskboard.
//!
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Task board REST API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TASKBOARD_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Directory with a built client to serve (overrides config)
    #[arg(long, global = true)]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,

    /// Create the database and its schema, then exit
    Init,
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db_path) = &self.database {
            config.server.db_path = db_path.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
    }
}
