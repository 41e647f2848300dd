//! Correctness Suite Binary
//!
//! Runs the remote storage correctness checks against a connector and exits
//! non-zero unless every selected check passes.

use remotecheck::config::{ConnectorSettings, ServerConfig};
use remotecheck::harness::{run_suite, CheckContext, Fixture, RunOptions, SuiteSettings};
use remotecheck::telemetry;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// remotecheck correctness suite
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Connector base URL (defaults to CONNECTOR_URL, then http://localhost:9201)
    #[arg(long)]
    connector_url: Option<String>,

    /// Connector storage is empty before the run
    #[arg(long)]
    fresh_tsdb: bool,

    /// Only run checks whose name contains this string (repeatable)
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Start the in-process reference connector and test it
    #[arg(long)]
    local: bool,

    /// Delay between a write and its verifying read, in milliseconds
    #[arg(long)]
    ingest_delay_ms: Option<u64>,

    /// Per-check timeout in seconds
    #[arg(long, env = "REMOTECHECK_CHECK_TIMEOUT_SECS", default_value = "60")]
    check_timeout_secs: u64,

    /// How long to wait for the connector to become reachable, in seconds
    #[arg(long, env = "REMOTECHECK_WAIT_TIMEOUT_SECS", default_value = "60")]
    wait_timeout_secs: u64,

    /// Write the JSON report to this file
    #[arg(long, env = "REMOTECHECK_REPORT")]
    report: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "REMOTECHECK_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init_for_component("correctness", &args.log_level)?;

    let mut connector = ConnectorSettings::from_env()?;
    if let Some(url) = &args.connector_url {
        connector = ConnectorSettings::new(url.clone())
            .with_credentials(connector.credentials)
            .with_timeout(connector.request_timeout);
    }

    let mut settings = SuiteSettings::from_env()?;
    settings.fresh_tsdb |= args.fresh_tsdb;
    if let Some(delay) = args.ingest_delay_ms {
        settings.ingest_delay = Duration::from_millis(delay);
    }

    let fixture = if args.local {
        let server = ServerConfig {
            credentials: connector.credentials.clone(),
            ..ServerConfig::from_env()?
        };
        // a freshly started in-process connector is always empty
        settings.fresh_tsdb = true;
        Fixture::local(server).await?
    } else {
        Fixture::from_config(connector)
    };

    info!(
        connector_url = fixture.url(),
        fresh_tsdb = settings.fresh_tsdb,
        ingest_delay_ms = settings.ingest_delay.as_millis() as u64,
        "Starting correctness suite"
    );

    fixture
        .wait_reachable(Duration::from_secs(args.wait_timeout_secs))
        .await
        .with_context(|| format!("connector at {} is not reachable", fixture.url()))?;

    let ctx = CheckContext::new(fixture.client()?, settings);
    let options = RunOptions {
        filters: args.filters,
        check_timeout: Duration::from_secs(args.check_timeout_secs),
    };
    let report = run_suite(&ctx, &options).await;

    println!("{}", report.summary());
    if let Some(path) = &args.report {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    fixture.shutdown().await?;
    std::process::exit(report.exit_code());
}
