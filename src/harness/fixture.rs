//! Fixture environment
//!
//! A fixture is the connector the suite runs against: either an existing
//! deployment reached by URL (e.g. the docker-compose stack in `deploy/`),
//! or the reference connector started in-process on an ephemeral port.

use crate::api;
use crate::client::RemoteClient;
use crate::config::{ConnectorSettings, ServerConfig};
use crate::store::{SeriesStore, StoreConfig};
use crate::{Error, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_HEALTH_PATH: &str = "/health";

struct LocalConnector {
    addr: SocketAddr,
    store: Arc<SeriesStore>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Result<()>>,
}

/// A connector endpoint plus, for local fixtures, the server behind it.
pub struct Fixture {
    settings: ConnectorSettings,
    health_path: String,
    local: Option<LocalConnector>,
}

impl Fixture {
    /// Point at an already running connector.
    pub fn from_config(settings: ConnectorSettings) -> Self {
        Self {
            settings,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            local: None,
        }
    }

    /// Start the reference connector on `127.0.0.1` with an ephemeral port.
    ///
    /// `config.listen` is ignored; credentials and limits are honored and
    /// the returned fixture's settings carry the same credentials.
    pub async fn local(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let store = Arc::new(SeriesStore::new(StoreConfig {
            retention: config.retention,
        }));
        let router = api::router_for(&config, store.clone());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(api::serve(listener, router, shutdown_rx));

        info!(%addr, "Local reference connector started");

        let settings = ConnectorSettings::new(format!("http://{addr}"))
            .with_credentials(config.credentials.clone());
        Ok(Self {
            settings,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            local: Some(LocalConnector {
                addr,
                store,
                shutdown,
                handle,
            }),
        })
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.settings.url
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    /// Address of the in-process connector, if this fixture started one.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local.as_ref().map(|local| local.addr)
    }

    /// Store of the in-process connector, if this fixture started one.
    pub fn store(&self) -> Option<&Arc<SeriesStore>> {
        self.local.as_ref().map(|local| &local.store)
    }

    pub fn client(&self) -> Result<RemoteClient> {
        RemoteClient::new(&self.settings)
    }

    /// Poll `GET {url}{health_path}` until the connector answers.
    ///
    /// Any HTTP response counts, so connectors without a health route are
    /// still detected once they accept connections.
    pub async fn wait_reachable(&self, timeout: Duration) -> Result<()> {
        let client = self.client()?;
        let url = format!("{}{}", self.settings.url, self.health_path);
        let deadline = Instant::now() + timeout;

        loop {
            match client.http().get(&url).timeout(POLL_INTERVAL * 4).send().await {
                Ok(response) => {
                    info!(url = %url, status = response.status().as_u16(), "Connector reachable");
                    return Ok(());
                }
                Err(e) => debug!(url = %url, error = %e, "Connector not reachable yet"),
            }
            if Instant::now() + POLL_INTERVAL > deadline {
                return Err(Error::Timeout);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Stop the in-process connector and wait for it to drain.
    pub async fn shutdown(mut self) -> Result<()> {
        let Some(local) = self.local.take() else {
            return Ok(());
        };
        let _ = local.shutdown.send(true);
        local
            .handle
            .await
            .map_err(|e| Error::Internal(format!("connector task failed: {e}")))?
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        if let Some(local) = self.local.take() {
            let _ = local.shutdown.send(true);
        }
    }
}
