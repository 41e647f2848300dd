//! Health endpoint tests
//!
//! Validates that the connector is running and exposed on its port.

use crate::e2e::E2EHarness;
use std::time::Duration;

/// Test that the connector is reachable
#[tokio::test]
#[ignore = "requires running docker-compose stack"]
async fn test_connector_reachable() {
    let harness = E2EHarness::from_env().expect("harness from env");

    harness
        .wait_healthy(Duration::from_secs(30))
        .await
        .expect("Connector should be reachable");
}

/// Test that the connector returns READY status
#[tokio::test]
#[ignore = "requires running docker-compose stack"]
async fn test_connector_ready() {
    let harness = E2EHarness::from_env().expect("harness from env");
    harness
        .wait_healthy(Duration::from_secs(30))
        .await
        .expect("Connector should be reachable");

    let resp = harness
        .http_client
        .get(format!("{}/ready", harness.url()))
        .send()
        .await
        .expect("Ready request should succeed");

    assert!(resp.status().is_success(), "Ready endpoint should return 2xx");
    let body = resp.text().await.expect("Should have response body");
    assert_eq!(body, "READY", "Ready endpoint should return 'READY'");
}
