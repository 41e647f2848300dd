//! Reference Connector Binary
//!
//! In-memory Prometheus remote storage connector used as the suite's fixture.

use remotecheck::api;
use remotecheck::config::{Credentials, ServerConfig};
use remotecheck::store::{SeriesStore, StoreConfig};
use remotecheck::telemetry;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

/// remotecheck reference connector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address
    #[arg(long, env = "REMOTECHECK_LISTEN", default_value = "0.0.0.0:9201")]
    listen: SocketAddr,

    /// Maximum request body size in bytes
    #[arg(long, env = "REMOTECHECK_MAX_BODY_BYTES", default_value = "16777216")]
    max_body_bytes: usize,

    /// Drop samples older than this many seconds
    #[arg(long, env = "REMOTECHECK_RETENTION_SECS")]
    retention_secs: Option<u64>,

    /// Basic-auth user required on remote endpoints
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    /// Basic-auth password required on remote endpoints
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Log level
    #[arg(long, env = "REMOTECHECK_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let credentials = match (&self.access_key_id, &self.secret_access_key) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (None, None) => None,
            _ => anyhow::bail!(
                "--access-key-id and --secret-access-key must be given together"
            ),
        };
        Ok(ServerConfig {
            listen: self.listen,
            max_body_size: self.max_body_bytes,
            credentials,
            retention: self.retention_secs.map(Duration::from_secs),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_for_component("connector", &args.log_level)?;

    let config = args.server_config()?;
    info!(
        listen = %config.listen,
        max_body_size = config.max_body_size,
        auth = config.credentials.is_some(),
        retention_secs = ?args.retention_secs,
        "Starting reference connector"
    );

    let store = Arc::new(SeriesStore::new(StoreConfig {
        retention: config.retention,
    }));
    let router = api::router_for(&config, store);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    info!(listen = %config.listen, "Connector ready");
    api::serve(listener, router, shutdown_rx).await?;
    info!("Connector shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
