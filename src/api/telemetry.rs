//! Request telemetry for the HTTP surface.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::{info_span, Instrument};

/// HTTP middleware that records request count, duration, and status-class errors.
pub async fn http_observability_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "http.request",
        http.request.method = %method,
        http.route = %route
    );
    let response = next.run(req).instrument(span).await;
    let status = response.status().as_u16();
    let elapsed = start.elapsed().as_secs_f64();

    counter!(
        "remotecheck_http_requests_total",
        "service" => crate::telemetry::service(),
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "remotecheck_http_request_duration_seconds",
        "service" => crate::telemetry::service(),
        "method" => method.clone(),
        "route" => route.clone()
    )
    .record(elapsed);
    if status >= 400 {
        counter!(
            "remotecheck_http_request_errors_total",
            "service" => crate::telemetry::service(),
            "method" => method,
            "route" => route,
            "status" => status.to_string()
        )
        .increment(1);
    }

    response
}
