//! Tracing subscriber setup.
//!
//! The `--log` option selects where output goes: `0`/`off`, `1`/`stdout`,
//! `2`/`stderr` (default) or a file name (appended to, without ANSI colors).
//! `RUST_LOG` overrides the level chosen by `--verbose`.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Parse the value of the `--log` option.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" | "" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the global tracing subscriber.
pub fn init(target: &LogTarget, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stdout)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
