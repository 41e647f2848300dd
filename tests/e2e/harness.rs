//! E2E Test Harness for remotecheck
//!
//! Wraps a [`Fixture`] pointing at a deployed connector, plus a plain HTTP
//! client for probes.

#![allow(dead_code)]

use anyhow::{Context, Result};
use remotecheck::client::RemoteClient;
use remotecheck::config::ConnectorSettings;
use remotecheck::harness::{CheckContext, Fixture, SuiteSettings};
use reqwest::Client;
use std::time::Duration;

/// E2E test harness for interacting with a deployed connector
pub struct E2EHarness {
    pub fixture: Fixture,
    /// HTTP client for probe requests
    pub http_client: Client,
}

impl E2EHarness {
    /// Create harness from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = ConnectorSettings::from_env().context("connector settings")?;
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            fixture: Fixture::from_config(settings),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        self.fixture.url()
    }

    /// Wait for the connector to accept requests
    pub async fn wait_healthy(&self, timeout: Duration) -> Result<()> {
        self.fixture
            .wait_reachable(timeout)
            .await
            .with_context(|| format!("connector at {} not reachable", self.url()))
    }

    pub fn client(&self) -> Result<RemoteClient> {
        Ok(self.fixture.client()?)
    }

    /// Check context using settings from the environment
    pub fn check_context(&self) -> Result<CheckContext> {
        Ok(CheckContext::new(self.client()?, SuiteSettings::from_env()?))
    }
}
