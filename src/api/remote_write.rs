//! Prometheus Remote Write receiver
//!
//! POST /write, /api/v1/write
//! Content-Encoding: snappy
//! Content-Type: application/x-protobuf

use super::{ApiError, ApiState};
use crate::codec::{self, CONTENT_ENCODING_SNAPPY};
use crate::proto::WriteRequest;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use metrics::counter;
use tracing::debug;

/// Handle Prometheus Remote Write requests
pub async fn handle_remote_write(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    check_content_encoding(&headers)?;

    let request: WriteRequest = codec::decode(&body)?;
    let summary = state.store.write(&request)?;

    counter!(
        "remotecheck_samples_written_total",
        "service" => crate::telemetry::service()
    )
    .increment(summary.samples as u64);
    debug!(
        timeseries = request.timeseries.len(),
        series = summary.series,
        samples = summary.samples,
        "Remote write accepted"
    );

    Ok(StatusCode::OK)
}

/// Reject payloads declared with an encoding other than snappy.
///
/// A missing `Content-Encoding` header is tolerated.
pub(crate) fn check_content_encoding(headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(value) = headers.get(header::CONTENT_ENCODING) else {
        return Ok(());
    };
    let encoding = value.to_str().unwrap_or_default().trim();
    if encoding.eq_ignore_ascii_case(CONTENT_ENCODING_SNAPPY) {
        return Ok(());
    }
    Err(ApiError::new(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        format!("unsupported Content-Encoding '{encoding}', expected snappy"),
    ))
}
