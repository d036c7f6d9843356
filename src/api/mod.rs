//! HTTP API module.
//!
//! Exposes the task routes over axum, plus server startup and shutdown.

mod server;
mod tasks;

pub use server::{AppState, ServerHandle, app, cors_layer, router, start_server};
