//! Integration tests for the statistics endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p tally-api)
//!
//! Run with: cargo test -p tally-integration-tests -- --ignored
//!
//! The statistics endpoints aggregate over the whole database, so these
//! tests assert on structure and on the presence of the data they insert
//! rather than on exact global values.

use reqwest::StatusCode;
use serde_json::{Value, json};

use tally_integration_tests::{
    base_url, client, create_customer, create_sale, register_and_login,
};

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_statistics_require_token() {
    let client = client();
    let base_url = base_url();

    for path in ["daily-sales", "top-customers"] {
        let resp = client
            .get(format!("{base_url}/api/statistics/{path}"))
            .send()
            .await
            .expect("Failed to send");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_daily_sales_returns_bare_array() {
    let client = client();
    let base_url = base_url();
    let token = register_and_login(&client).await;

    let customer = create_customer(&client, &token, "Daily Buyer").await;
    let customer_id = customer["id"].as_i64().expect("customer id");
    create_sale(&client, &token, customer_id, 10.0, "2023-01-15").await;
    create_sale(&client, &token, customer_id, 5.5, "2023-01-15").await;

    let resp = client
        .get(format!("{base_url}/api/statistics/daily-sales"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch daily sales");
    assert_eq!(resp.status(), StatusCode::OK);

    // Bare array, no envelope
    let body: Value = resp.json().await.expect("Failed to parse response");
    let entries = body.as_array().expect("daily sales should be an array");
    assert!(entries.len() <= 30, "at most 30 days are returned");
    for entry in entries {
        assert!(entry["date"].is_string());
        assert!(entry["total"].is_number());
    }
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_daily_sales_respects_date_range() {
    let client = client();
    let base_url = base_url();
    let token = register_and_login(&client).await;

    let customer = create_customer(&client, &token, "Ranged Buyer").await;
    let customer_id = customer["id"].as_i64().expect("customer id");
    create_sale(&client, &token, customer_id, 11.0, "2022-03-10").await;
    create_sale(&client, &token, customer_id, 22.0, "2022-03-20").await;

    let resp = client
        .get(format!("{base_url}/api/statistics/daily-sales"))
        .query(&[("startDate", "2022-03-15"), ("endDate", "2022-03-25")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch daily sales");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let entries = body.as_array().expect("array");
    assert!(
        entries.iter().any(|e| e["date"] == json!("2022-03-20")),
        "in-range day present"
    );
    assert!(
        entries.iter().all(|e| e["date"] != json!("2022-03-10")),
        "out-of-range day excluded"
    );
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_daily_sales_rejects_bad_dates() {
    let client = client();
    let base_url = base_url();
    let token = register_and_login(&client).await;

    let resp = client
        .get(format!("{base_url}/api/statistics/daily-sales"))
        .query(&[("startDate", "15-03-2022")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], json!("Invalid date format"));
}

#[tokio::test]
#[ignore = "Requires a running tally-api server and PostgreSQL"]
async fn test_top_customers_shape() {
    let client = client();
    let base_url = base_url();
    let token = register_and_login(&client).await;

    // Make sure at least one customer has sales
    let customer = create_customer(&client, &token, "Top Buyer").await;
    let customer_id = customer["id"].as_i64().expect("customer id");
    create_sale(&client, &token, customer_id, 100.0, "2024-01-01").await;

    let resp = client
        .get(format!("{base_url}/api/statistics/top-customers"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch top customers");
    assert_eq!(resp.status(), StatusCode::OK);

    // Bare object, no envelope
    let body: Value = resp.json().await.expect("Failed to parse response");
    for key in ["highestVolume", "highestAverage", "highestFrequency"] {
        assert!(body[key].is_object(), "missing {key}");
        assert!(body[key]["clientId"].is_number(), "{key} should have a leader");
        assert!(body[key]["name"].is_string());
    }
    assert!(body["highestVolume"]["total"].is_number());
    assert!(body["highestAverage"]["average"].is_number());
    assert!(body["highestFrequency"]["frequency"].is_number());
}
