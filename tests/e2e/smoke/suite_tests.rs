//! Correctness suite against the deployed connector

use crate::e2e::E2EHarness;
use remotecheck::client::SeriesRecord;
use remotecheck::harness::{run_suite, RunOptions};
use std::time::Duration;

/// Full suite passes against the docker-compose connector
#[tokio::test]
#[ignore = "requires running docker-compose stack"]
async fn test_full_suite_passes() {
    let harness = E2EHarness::from_env().expect("harness from env");
    harness
        .wait_healthy(Duration::from_secs(30))
        .await
        .expect("Connector should be reachable");

    let ctx = harness.check_context().expect("check context");
    let report = run_suite(&ctx, &RunOptions::default()).await;
    assert_eq!(report.exit_code(), 0, "{}", report.summary());
}

/// A single write is visible to a read of the same series
#[tokio::test]
#[ignore = "requires running docker-compose stack"]
async fn test_write_read_roundtrip() {
    let harness = E2EHarness::from_env().expect("harness from env");
    harness
        .wait_healthy(Duration::from_secs(30))
        .await
        .expect("Connector should be reachable");

    let client = harness.client().expect("client");
    let now = client.clock().now_ms();
    let status = client
        .remote_write(&[SeriesRecord::new()
            .label("__name__", "e2e_roundtrip_total")
            .label("instance", "e2e")
            .sample(42.0, now)])
        .await
        .expect("remote write");
    assert_eq!(status, 200);

    tokio::time::sleep(Duration::from_secs(1)).await;

    let response = client
        .remote_read(r#"e2e_roundtrip_total{instance="e2e"}[10s]"#)
        .await
        .expect("remote read");
    let series = response.first_series();
    assert!(!series.is_empty(), "written series should be readable");
    assert!(series[0].samples.iter().any(|s| s.value == 42.0));
}
