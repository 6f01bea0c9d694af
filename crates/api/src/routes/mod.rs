//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register               - Register a new operator
//! POST /api/auth/login                  - Login, returns a bearer token
//!
//! # Customers (requires auth)
//! POST   /api/customers                 - Create customer
//! GET    /api/customers                 - List customers (filters + pagination)
//! GET    /api/customers/{id}            - Customer detail with sales
//! PUT    /api/customers/{id}            - Partial update
//! DELETE /api/customers/{id}            - Delete customer and its sales
//!
//! # Sales (requires auth)
//! POST /api/sales                       - Record a sale
//! GET  /api/sales                       - List all sales with customer info
//! GET  /api/sales/customer/{customerId} - Sales for one customer
//!
//! # Statistics (requires auth)
//! GET /api/statistics/daily-sales       - Per-day totals (optional date range)
//! GET /api/statistics/top-customers     - Volume/average/frequency leaders
//! ```
//!
//! CRUD responses use the envelope `{"success": true, "data": ..., "message": ...}`.
//! Statistics endpoints return their payloads bare. Errors always use
//! `{"success": false, "error": "..."}`.

pub mod auth;
pub mod customers;
pub mod sales;
pub mod statistics;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;

use crate::middleware;
use crate::state::AppState;

/// Success envelope for CRUD responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope with a data payload.
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Envelope with a data payload and a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with only a message, no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Create the full `/api` route tree.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/customers", customer_routes())
        .nest("/api/sales", sale_routes())
        .nest("/api/statistics", statistics_routes())
        .fallback(not_found)
}

/// Create the auth routes router.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(middleware::auth_rate_limiter())
}

/// Create the customer routes router.
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create).get(customers::list))
        .route(
            "/{id}",
            get(customers::get_one)
                .put(customers::update)
                .delete(customers::remove),
        )
}

/// Create the sale routes router.
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sales::create).get(sales::list))
        .route("/customer/{customerId}", get(sales::by_customer))
}

/// Create the statistics routes router.
fn statistics_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-sales", get(statistics::daily_sales))
        .route("/top-customers", get(statistics::top_customers))
}

/// Fallback for unknown routes.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found",
        })),
    )
}
