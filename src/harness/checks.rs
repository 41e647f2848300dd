//! The correctness checks
//!
//! Each check mirrors what Prometheus itself does against remote storage:
//! push series with remote write, wait for ingestion, then read them back
//! with a selector and compare labels, values and sample order.

use super::{generate_test_run_id, SuiteSettings};
use crate::client::{is_empty, label_value, RemoteClient, SeriesRecord};
use crate::proto::{ReadResponse, TimeSeries, METRIC_NAME_LABEL};
use crate::{Error, Result};

use std::fmt;
use std::str::FromStr;
use tracing::debug;

const REQUESTS_METRIC: &str = "prometheus_http_requests_total";
const CUSTOM_METRIC: &str = "mockmetheus_custom_metric";
const INSTANCE: &str = "mockmetheus";
const HANDLER: &str = "/api/v1/query";
const JOB: &str = "prometheus";

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(Error::CheckFailed(format!($($arg)+)));
        }
    };
}

/// Everything a check needs to talk to the connector.
pub struct CheckContext {
    pub client: RemoteClient,
    pub settings: SuiteSettings,
}

impl CheckContext {
    pub fn new(client: RemoteClient, settings: SuiteSettings) -> Self {
        Self { client, settings }
    }

    fn now_ms(&self) -> i64 {
        self.client.clock().now_ms()
    }

    async fn wait_for_ingest(&self) {
        tokio::time::sleep(self.settings.ingest_delay).await;
    }

    async fn write_ok(&self, records: &[SeriesRecord]) -> Result<()> {
        let status = self.client.remote_write(records).await?;
        ensure!(status == 200, "remote write returned {status}, expected 200");
        Ok(())
    }
}

/// A named correctness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    EmptyOnInit,
    ReadMetricDne,
    WriteNoData,
    WriteNoLabels,
    WriteNoSamples,
    Success,
    SuccessWriteMultipleMetrics,
    SuccessMultipleSamples,
    SuccessLabelMatchers,
}

impl Check {
    /// Every check, in execution order.
    pub const ALL: [Check; 9] = [
        Check::EmptyOnInit,
        Check::ReadMetricDne,
        Check::WriteNoData,
        Check::WriteNoLabels,
        Check::WriteNoSamples,
        Check::Success,
        Check::SuccessWriteMultipleMetrics,
        Check::SuccessMultipleSamples,
        Check::SuccessLabelMatchers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::EmptyOnInit => "empty_on_init",
            Check::ReadMetricDne => "read_metric_dne",
            Check::WriteNoData => "write_no_data",
            Check::WriteNoLabels => "write_no_labels",
            Check::WriteNoSamples => "write_no_samples",
            Check::Success => "success",
            Check::SuccessWriteMultipleMetrics => "success_write_multiple_metrics",
            Check::SuccessMultipleSamples => "success_multiple_samples",
            Check::SuccessLabelMatchers => "success_label_matchers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Check::EmptyOnInit => "remote read returns nothing before any write",
            Check::ReadMetricDne => "remote read of an unknown metric is empty",
            Check::WriteNoData => "remote write with no time series succeeds",
            Check::WriteNoLabels => "remote write of a label-less series is accepted or rejected with 400",
            Check::WriteNoSamples => "remote write of a series without samples stores nothing",
            Check::Success => "a written sample is read back, with and without read hints",
            Check::SuccessWriteMultipleMetrics => "two metrics in one write are readable by name",
            Check::SuccessMultipleSamples => "multiple samples come back in timestamp order",
            Check::SuccessLabelMatchers => "negative equality and regex matchers select the right series",
        }
    }

    pub async fn run(&self, ctx: &CheckContext) -> Result<()> {
        match self {
            Check::EmptyOnInit => empty_on_init(ctx).await,
            Check::ReadMetricDne => read_metric_dne(ctx).await,
            Check::WriteNoData => write_no_data(ctx).await,
            Check::WriteNoLabels => write_no_labels(ctx).await,
            Check::WriteNoSamples => write_no_samples(ctx).await,
            Check::Success => success(ctx).await,
            Check::SuccessWriteMultipleMetrics => success_write_multiple_metrics(ctx).await,
            Check::SuccessMultipleSamples => success_multiple_samples(ctx).await,
            Check::SuccessLabelMatchers => success_label_matchers(ctx).await,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Check {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().trim_start_matches("test_");
        Check::ALL
            .into_iter()
            .find(|check| check.name() == name)
            .ok_or_else(|| Error::Config(format!("unknown check '{s}'")))
    }
}

async fn empty_on_init(ctx: &CheckContext) -> Result<()> {
    let response = if ctx.settings.fresh_tsdb {
        ctx.client
            .remote_read(&format!("{REQUESTS_METRIC}{{}}"))
            .await?
    } else {
        // older runs may have left data; only look at a window nothing has written to
        tokio::time::sleep(ctx.settings.quiet_period).await;
        ctx.client
            .remote_read(&format!("{REQUESTS_METRIC}{{}}[3s]"))
            .await?
    };
    ensure!(
        is_empty(&response),
        "expected no series, got {}",
        response.first_series().len()
    );
    Ok(())
}

async fn read_metric_dne(ctx: &CheckContext) -> Result<()> {
    let response = ctx.client.remote_read("non_existent_metric").await?;
    ensure!(is_empty(&response), "unknown metric returned series");
    Ok(())
}

async fn write_no_data(ctx: &CheckContext) -> Result<()> {
    ctx.write_ok(&[]).await
}

async fn write_no_labels(ctx: &CheckContext) -> Result<()> {
    let record = SeriesRecord::new().sample(220.0, ctx.now_ms());
    match ctx.client.remote_write(&[record]).await {
        Ok(status) => {
            debug!(status, "Label-less series accepted");
            Ok(())
        }
        Err(e) => match e.status() {
            Some(400) => Ok(()),
            Some(status) => Err(Error::CheckFailed(format!(
                "label-less series rejected with {status}, expected 400"
            ))),
            None => Err(e),
        },
    }
}

async fn write_no_samples(ctx: &CheckContext) -> Result<()> {
    let record = SeriesRecord::new()
        .label(METRIC_NAME_LABEL, REQUESTS_METRIC)
        .label("instance", INSTANCE);
    ctx.write_ok(&[record]).await?;
    ctx.wait_for_ingest().await;

    let response = ctx
        .client
        .remote_read(&format!("{REQUESTS_METRIC}{{instance=\"{INSTANCE}\"}}[3s]"))
        .await?;
    ensure!(is_empty(&response), "series without samples was returned");
    Ok(())
}

async fn success(ctx: &CheckContext) -> Result<()> {
    let test_id = generate_test_run_id();
    let expected = 220.0;
    let record = SeriesRecord::new()
        .label(METRIC_NAME_LABEL, REQUESTS_METRIC)
        .label("instance", INSTANCE)
        .label("test_id", &test_id)
        .sample(expected, ctx.now_ms());
    ctx.write_ok(&[record]).await?;
    ctx.wait_for_ingest().await;

    let matchers = format!("instance=\"{INSTANCE}\", test_id=\"{test_id}\"");
    let response = ctx
        .client
        .remote_read(&format!("{REQUESTS_METRIC}{{{matchers}}}[3s]"))
        .await?;
    let series = first_series(&response)?;
    expect_label(series, METRIC_NAME_LABEL, REQUESTS_METRIC)?;
    expect_label(series, "instance", INSTANCE)?;
    expect_value(series, 0, expected)?;

    let end = ctx.now_ms();
    let start = end - 3000;
    let response = ctx
        .client
        .remote_read(&format!(
            "{REQUESTS_METRIC}{{{matchers}}} @ {{read_hints=\"start={start},end={end}\"}}"
        ))
        .await?;
    let series = first_series(&response)?;
    expect_label(series, METRIC_NAME_LABEL, REQUESTS_METRIC)?;
    expect_label(series, "instance", INSTANCE)?;
    expect_value(series, 0, expected)?;
    Ok(())
}

async fn success_write_multiple_metrics(ctx: &CheckContext) -> Result<()> {
    let test_id = generate_test_run_id();
    let now = ctx.now_ms();
    let records = [
        common_labels(REQUESTS_METRIC, &test_id, JOB).sample(300.0, now),
        common_labels(CUSTOM_METRIC, &test_id, JOB).sample(400.0, now),
    ];
    ctx.write_ok(&records).await?;
    ctx.wait_for_ingest().await;

    for (metric, expected) in [(REQUESTS_METRIC, 300.0), (CUSTOM_METRIC, 400.0)] {
        let response = ctx
            .client
            .remote_read(&format!(
                "{metric}{{instance=\"{INSTANCE}\", job=\"{JOB}\", test_id=\"{test_id}\"}}[3s]"
            ))
            .await?;
        let series = first_series(&response)?;
        expect_label(series, METRIC_NAME_LABEL, metric)?;
        expect_value(series, 0, expected)?;
    }
    Ok(())
}

async fn success_multiple_samples(ctx: &CheckContext) -> Result<()> {
    let test_id = generate_test_run_id();
    let now = ctx.now_ms();
    let record = common_labels(REQUESTS_METRIC, &test_id, JOB)
        .sample(300.0, now)
        .sample(400.0, now - 100);
    ctx.write_ok(&[record]).await?;
    ctx.wait_for_ingest().await;

    let response = ctx
        .client
        .remote_read(&format!(
            "{REQUESTS_METRIC}{{handler=\"{HANDLER}\", instance=\"{INSTANCE}\", job=\"{JOB}\", test_id=\"{test_id}\"}}[3s]"
        ))
        .await?;
    let series = first_series(&response)?;
    expect_label(series, METRIC_NAME_LABEL, REQUESTS_METRIC)?;
    expect_label(series, "handler", HANDLER)?;
    expect_label(series, "instance", INSTANCE)?;
    ensure!(
        series.samples.len() == 2,
        "expected 2 samples, got {}",
        series.samples.len()
    );
    // ascending by timestamp: the older sample first
    expect_value(series, 0, 400.0)?;
    expect_value(series, 1, 300.0)?;
    Ok(())
}

async fn success_label_matchers(ctx: &CheckContext) -> Result<()> {
    let test_id = generate_test_run_id();
    let other_job = "mockmetheus";
    let now = ctx.now_ms();
    let records = [
        common_labels(REQUESTS_METRIC, &test_id, JOB)
            .label("code", "200")
            .sample(100.0, now)
            .sample(200.0, now - 100),
        common_labels(REQUESTS_METRIC, &test_id, other_job)
            .label("code", "400")
            .sample(100.0, now)
            .sample(200.0, now - 100)
            .sample(300.0, now - 200),
        common_labels(REQUESTS_METRIC, &test_id, JOB)
            .label("code", "404")
            .sample(100.0, now),
    ];
    ctx.write_ok(&records).await?;
    ctx.wait_for_ingest().await;

    // NEQ
    let response = ctx
        .client
        .remote_read(&format!(
            "{REQUESTS_METRIC}{{job!=\"{JOB}\", test_id=\"{test_id}\"}}[3s]"
        ))
        .await?;
    expect_shape(&response, 1, Some(3), "job!=")?;

    // NRE
    let response = ctx
        .client
        .remote_read(&format!(
            "{REQUESTS_METRIC}{{code!~\"2..\", test_id=\"{test_id}\"}}[3s]"
        ))
        .await?;
    expect_shape(&response, 2, None, "code!~")?;

    // EQ + NRE
    let response = ctx
        .client
        .remote_read(&format!(
            "{REQUESTS_METRIC}{{job=\"{other_job}\", code!~\"2..\", test_id=\"{test_id}\"}}[5s]"
        ))
        .await?;
    expect_shape(&response, 1, Some(3), "job= with code!~")?;
    Ok(())
}

fn common_labels(metric: &str, test_id: &str, job: &str) -> SeriesRecord {
    SeriesRecord::new()
        .label(METRIC_NAME_LABEL, metric)
        .label("handler", HANDLER)
        .label("instance", INSTANCE)
        .label("test_id", test_id)
        .label("job", job)
}

fn first_series(response: &ReadResponse) -> Result<&TimeSeries> {
    response
        .first_series()
        .first()
        .ok_or_else(|| Error::CheckFailed("expected at least one series, got none".to_string()))
}

fn expect_label(series: &TimeSeries, name: &str, expected: &str) -> Result<()> {
    let actual = label_value(series, name);
    ensure!(
        actual == Some(expected),
        "label {name}: expected {expected:?}, got {actual:?}"
    );
    Ok(())
}

fn expect_value(series: &TimeSeries, index: usize, expected: f64) -> Result<()> {
    let actual = series.samples.get(index).map(|s| s.value);
    ensure!(
        actual == Some(expected),
        "sample {index}: expected value {expected}, got {actual:?}"
    );
    Ok(())
}

fn expect_shape(
    response: &ReadResponse,
    series: usize,
    samples: Option<usize>,
    what: &str,
) -> Result<()> {
    let returned = response.first_series();
    ensure!(
        returned.len() == series,
        "{what}: expected {series} series, got {}",
        returned.len()
    );
    if let Some(samples) = samples {
        let actual = returned[0].samples.len();
        ensure!(
            actual == samples,
            "{what}: expected {samples} samples, got {actual}"
        );
    }
    Ok(())
}
