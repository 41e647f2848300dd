//! Reference connector HTTP API
//!
//! Serves the Prometheus remote storage endpoints over an in-memory store:
//! - Remote Write (`/write`, `/api/v1/write`)
//! - Remote Read (`/read`, `/api/v1/read`)
//! - Health and readiness probes

mod auth;
mod error;
pub mod remote_read;
pub mod remote_write;
mod telemetry;

pub use error::ApiError;

use crate::config::{Credentials, ServerConfig};
use crate::store::SeriesStore;
use crate::{Error, Result};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::limit::RequestBodyLimitLayer;

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<SeriesStore>,
    /// Basic-auth credentials required on the remote endpoints, if any
    pub credentials: Option<Arc<Credentials>>,
}

impl ApiState {
    pub fn new(store: Arc<SeriesStore>, credentials: Option<Credentials>) -> Self {
        Self {
            store,
            credentials: credentials.map(Arc::new),
        }
    }
}

/// Build the HTTP API router
pub fn build_http_router(state: ApiState, max_body_size: usize) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let remote = Router::new()
        // Prometheus Remote Write
        .route("/write", post(remote_write::handle_remote_write))
        .route("/api/v1/write", post(remote_write::handle_remote_write))
        // Prometheus Remote Read
        .route("/read", post(remote_read::handle_remote_read))
        .route("/api/v1/read", post(remote_read::handle_remote_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .merge(remote)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(middleware::from_fn(telemetry::http_observability_middleware))
}

/// Build the router for `config` around `store`.
pub fn router_for(config: &ServerConfig, store: Arc<SeriesStore>) -> Router {
    build_http_router(
        ApiState::new(store, config.credentials.clone()),
        config.max_body_size,
    )
}

/// Serve `router` on `listener` until `shutdown` flips to true.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(|e| Error::Internal(format!("HTTP server error: {e}")))
}

pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if *shutdown.borrow() {
        return;
    }
    let _ = shutdown.changed().await;
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn ready_check() -> &'static str {
    "READY"
}
