//! Remote-write / remote-read HTTP client
//!
//! Speaks the Prometheus remote storage protocol to a connector: requests
//! are snappy-compressed protobuf, optionally with basic auth.

use crate::clock::{Clock, SystemClock};
use crate::codec::{
    self, CONTENT_ENCODING_SNAPPY, CONTENT_TYPE_PROTOBUF, REMOTE_PROTOCOL_VERSION,
    REMOTE_READ_VERSION_HEADER, REMOTE_WRITE_VERSION_HEADER,
};
use crate::config::{ConnectorSettings, Credentials};
use crate::proto::{Label, ReadRequest, ReadResponse, Sample, TimeSeries, WriteRequest};
use crate::query::build_read_request;
use crate::{Error, Result};

use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("remotecheck/", env!("CARGO_PKG_VERSION"));

/// One time series to push: labels in insertion order plus `(value, timestamp_ms)` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesRecord {
    pub labels: Vec<(String, String)>,
    pub samples: Vec<(f64, i64)>,
}

impl SeriesRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((name.into(), value.into()));
        self
    }

    pub fn sample(mut self, value: f64, timestamp_ms: i64) -> Self {
        self.samples.push((value, timestamp_ms));
        self
    }

    pub fn to_time_series(&self) -> TimeSeries {
        TimeSeries {
            labels: self
                .labels
                .iter()
                .map(|(name, value)| Label::new(name, value))
                .collect(),
            samples: self
                .samples
                .iter()
                .map(|(value, ts)| Sample::new(*value, *ts))
                .collect(),
            exemplars: Vec::new(),
        }
    }
}

/// Build a `WriteRequest` with one series per record, in record order.
pub fn build_write_request(records: &[SeriesRecord]) -> WriteRequest {
    WriteRequest {
        timeseries: records.iter().map(SeriesRecord::to_time_series).collect(),
        metadata: Vec::new(),
    }
}

/// Client for a remote storage connector
#[derive(Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
    clock: Arc<dyn Clock>,
}

impl RemoteClient {
    pub fn new(settings: &ConnectorSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            credentials: settings.credentials.clone(),
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Use `clock` for read windows.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Push `records` to `{base}/write` and return the response status.
    pub async fn remote_write(&self, records: &[SeriesRecord]) -> Result<u16> {
        self.write_request(&build_write_request(records)).await
    }

    #[instrument(skip_all, fields(series = request.timeseries.len()))]
    pub async fn write_request(&self, request: &WriteRequest) -> Result<u16> {
        let payload = codec::encode(request)?;
        let response = self
            .post("write", payload)
            .header(REMOTE_WRITE_VERSION_HEADER, REMOTE_PROTOCOL_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), "Remote write sent");
        Ok(status.as_u16())
    }

    /// Parse `selector`, read it from `{base}/read` and sort each series' labels.
    pub async fn remote_read(&self, selector: &str) -> Result<ReadResponse> {
        let request = build_read_request(selector, self.clock.as_ref())?;
        debug!(selector, "Remote read");
        self.read_request(&request).await
    }

    #[instrument(skip_all, fields(queries = request.queries.len()))]
    pub async fn read_request(&self, request: &ReadRequest) -> Result<ReadResponse> {
        let payload = codec::encode(request)?;
        let response = self
            .post("read", payload)
            .header(REMOTE_READ_VERSION_HEADER, REMOTE_PROTOCOL_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let mut decoded: ReadResponse = codec::decode(&body)?;
        for result in &mut decoded.results {
            for series in &mut result.timeseries {
                series.sort_labels();
            }
        }
        Ok(decoded)
    }

    fn post(&self, path: &str, payload: Vec<u8>) -> RequestBuilder {
        let builder = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .header(CONTENT_TYPE, CONTENT_TYPE_PROTOBUF)
            .header(CONTENT_ENCODING, CONTENT_ENCODING_SNAPPY)
            .body(payload);
        match &self.credentials {
            Some(creds) => {
                builder.basic_auth(&creds.access_key_id, Some(&creds.secret_access_key))
            }
            None => builder,
        }
    }
}

/// True when `response` has no series for its first query.
pub fn is_empty(response: &ReadResponse) -> bool {
    response.is_empty()
}

/// Value of label `name` on `series`.
pub fn label_value<'a>(series: &'a TimeSeries, name: &str) -> Option<&'a str> {
    series.label_value(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::QueryResult;

    #[test]
    fn test_record_keeps_order() {
        let record = SeriesRecord::new()
            .label("__name__", "up")
            .label("instance", "a")
            .sample(1.0, 20)
            .sample(2.0, 10);
        let series = record.to_time_series();
        assert_eq!(series.labels[1].name, "instance");
        assert_eq!(series.samples[0], Sample::new(1.0, 20));
        assert_eq!(series.samples[1].timestamp, 10);
    }

    #[test]
    fn test_build_write_request() {
        let request = build_write_request(&[SeriesRecord::new(), SeriesRecord::new()]);
        assert_eq!(request.timeseries.len(), 2);
        assert!(build_write_request(&[]).timeseries.is_empty());
    }

    #[test]
    fn test_helpers() {
        let mut response = ReadResponse {
            results: vec![QueryResult::default()],
        };
        assert!(is_empty(&response));
        response.results[0].timeseries.push(
            SeriesRecord::new()
                .label("__name__", "up")
                .sample(1.0, 1)
                .to_time_series(),
        );
        assert!(!is_empty(&response));
        assert_eq!(label_value(&response.results[0].timeseries[0], "__name__"), Some("up"));
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = RemoteClient::new(&ConnectorSettings::new("http://localhost:9201/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9201");
    }
}
