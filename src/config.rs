//! Configuration loading and management.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. YAML file (`TASKBOARD_CONFIG_PATH`, or `taskboard.yaml` in the working directory)
//! 3. Environment variables (`TASKBOARD_DB_PATH`, `TASKBOARD_HOST`, `TASKBOARD_PORT`,
//!    `TASKBOARD_STATIC_DIR`)
//!
//! CLI flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "taskboard.yaml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server and storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origins allowed by CORS. `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Directory with a built client bundle, served for unmatched paths.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            cors_origins: default_cors_origins(),
            static_dir: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_db_path() -> PathBuf {
    PathBuf::from("database.db")
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text. Missing fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve configuration from file and environment.
    ///
    /// An explicitly named file (argument or `TASKBOARD_CONFIG_PATH`) must
    /// exist; the default `taskboard.yaml` is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os("TASKBOARD_CONFIG_PATH").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(db_path) = lookup("TASKBOARD_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }

        if let Some(host) = lookup("TASKBOARD_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("TASKBOARD_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "TASKBOARD_PORT",
                value: port,
            })?;
        }

        if let Some(dir) = lookup("TASKBOARD_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
