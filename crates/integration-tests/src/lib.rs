//! Integration tests for Tally.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p tally-cli -- migrate
//!
//! # Start the API server
//! cargo run -p tally-api
//!
//! # Run integration tests
//! cargo test -p tally-integration-tests -- --ignored
//! ```
//!
//! Every test registers its own operator with a unique email, so a shared
//! development database stays usable between runs.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("TALLY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email address for test isolation.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.tally.local", Uuid::new_v4())
}

/// Register a fresh operator and return its bearer token.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn register_and_login(client: &Client) -> String {
    let base_url = base_url();
    let email = unique_email("operator");
    let password = "hunter2-but-longer";

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Test Operator",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register operator");
    assert!(
        resp.status().is_success(),
        "registration failed: {}",
        resp.status()
    );

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login");
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("login response missing token")
        .to_owned()
}

/// Create a customer via the API and return its JSON representation.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_customer(client: &Client, token: &str, name: &str) -> Value {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/customers"))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "email": unique_email("customer"),
            "birthDate": "1990-05-15",
        }))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), 201, "customer creation failed");

    let body: Value = resp
        .json()
        .await
        .expect("Failed to parse customer response");
    body["data"].clone()
}

/// Record a sale for a customer and return its JSON representation.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_sale(
    client: &Client,
    token: &str,
    customer_id: i64,
    amount: f64,
    date: &str,
) -> Value {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/sales"))
        .bearer_auth(token)
        .json(&json!({
            "customerId": customer_id,
            "amount": amount,
            "date": date,
        }))
        .send()
        .await
        .expect("Failed to create sale");
    assert_eq!(resp.status(), 201, "sale creation failed");

    let body: Value = resp.json().await.expect("Failed to parse sale response");
    body["data"].clone()
}
