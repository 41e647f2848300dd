//! Prometheus Remote Read endpoint
//!
//! POST /read, /api/v1/read with a snappy-compressed `ReadRequest`; answers
//! with a snappy-compressed `ReadResponse` using the SAMPLES response type.

use super::remote_write::check_content_encoding;
use super::{ApiError, ApiState};
use crate::codec::{self, CONTENT_ENCODING_SNAPPY, CONTENT_TYPE_PROTOBUF};
use crate::proto::ReadRequest;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use tracing::debug;

/// Handle Prometheus Remote Read requests
pub async fn handle_remote_read(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    check_content_encoding(&headers)?;

    let request: ReadRequest = codec::decode(&body)?;
    let response = state.store.read_request(&request)?;
    let payload = codec::encode(&response)?;

    debug!(
        queries = request.queries.len(),
        series = response.results.iter().map(|r| r.timeseries.len()).sum::<usize>(),
        bytes = payload.len(),
        "Remote read served"
    );

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE_PROTOBUF),
            (header::CONTENT_ENCODING, CONTENT_ENCODING_SNAPPY),
        ],
        payload,
    ))
}
