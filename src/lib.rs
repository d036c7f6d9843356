//! Task board library.
//!
//! A REST API for a flat list of tasks stored in SQLite. This module exports
//! the core components for testing and integration.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
