//! Integration tests for health endpoints and the 404 fallback.
//!
//! Run with: cargo test -p tally-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use tally_integration_tests::{base_url, client};

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_health() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to fetch health");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_readiness() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to fetch readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_unknown_route_returns_json_404() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/does-not-exist"))
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Route not found"));
}
