//! HTTP server implementation.
//!
//! Builds the axum router for the task API and manages the listener lifecycle.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    response::IntoResponse,
    routing::{get, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::tasks;
use crate::config::ServerConfig;
use crate::db::Database;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Reference to the task database.
    db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the task API routes with no middleware attached.
pub fn router(db: Arc<Database>) -> Router {
    Router::new()
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/health", get(health))
        .with_state(AppState::new(db))
}

/// CORS policy for the configured origins. `"*"` allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Build the full application: routes, optional static client, CORS and tracing.
pub fn app(db: Arc<Database>, config: &ServerConfig) -> Result<Router> {
    let mut app = router(db);

    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Start the HTTP server described by `config`.
///
/// The listener is bound before this returns, so a port of 0 yields the
/// actual ephemeral port through [`ServerHandle::local_addr`].
pub async fn start_server(db: Arc<Database>, config: &ServerConfig) -> Result<ServerHandle> {
    let service = app(db, config)?;

    let bind = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(bind.as_str())
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    let addr = listener.local_addr()?;

    info!("Task API listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, service)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task API shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn cors_accepts_wildcard_and_explicit_origins() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
    }

    #[test]
    fn cors_rejects_invalid_origin() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
