//! Sale recording and listing handlers.
//!
//! All endpoints require a bearer token. Sales are append-only.

use axum::{extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{CustomerId, Money, SaleId};

use crate::db::{CustomerRepository, SaleRepository};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::CurrentOperator;
use crate::models::{CustomerRef, Sale, SaleWithCustomer};
use crate::routes::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_id: CustomerId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// `YYYY-MM-DD`; defaults to today (UTC) when omitted.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRefResponse {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

impl From<CustomerRef> for CustomerRefResponse {
    fn from(customer: CustomerRef) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: SaleId,
    pub customer_id: CustomerId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRefResponse>,
}

impl SaleResponse {
    fn new(sale: Sale, customer: Option<CustomerRefResponse>) -> Self {
        Self {
            id: sale.id,
            customer_id: sale.customer_id,
            amount: sale.amount.amount(),
            date: sale.sale_date,
            customer,
        }
    }
}

impl From<SaleWithCustomer> for SaleResponse {
    fn from(joined: SaleWithCustomer) -> Self {
        let customer = CustomerRefResponse::from(joined.customer);
        Self::new(joined.sale, Some(customer))
    }
}

/// `POST /api/sales`
pub async fn create(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaleResponse>>)> {
    let amount = Money::parse(req.amount).map_err(|e| AppError::Validation(e.to_string()))?;
    let sale_date = match req.date {
        Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date format".to_string()))?,
        None => Utc::now().date_naive(),
    };

    let customer = CustomerRepository::new(state.pool())
        .get_by_id(req.customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    let sale = SaleRepository::new(state.pool())
        .create(customer.id, amount, sale_date)
        .await?;

    tracing::info!(sale_id = %sale.id, customer_id = %customer.id, "Sale recorded");

    let customer_ref = CustomerRefResponse {
        id: customer.id,
        name: customer.name,
        email: customer.email.into_inner(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            SaleResponse::new(sale, Some(customer_ref)),
            "Sale created successfully",
        )),
    ))
}

/// `GET /api/sales`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
) -> Result<Json<ApiResponse<Vec<SaleResponse>>>> {
    let sales = SaleRepository::new(state.pool()).all_with_customer().await?;

    Ok(Json(ApiResponse::data(
        sales.into_iter().map(SaleResponse::from).collect(),
    )))
}

/// `GET /api/sales/customer/{customerId}`
pub async fn by_customer(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<ApiResponse<Vec<SaleResponse>>>> {
    let sales = SaleRepository::new(state.pool())
        .by_customer(customer_id)
        .await?;

    Ok(Json(ApiResponse::data(
        sales
            .into_iter()
            .map(|sale| SaleResponse::new(sale, None))
            .collect(),
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeZone};
    use serde_json::json;
    use tally_core::Email;

    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_create_request_accepts_numeric_amount() {
        let req: CreateSaleRequest = serde_json::from_value(json!({
            "customerId": 4,
            "amount": 99.9,
            "date": "2024-06-01",
        }))
        .unwrap();
        assert_eq!(req.customer_id, CustomerId::new(4));
        assert_eq!(req.amount, Decimal::new(999, 1));
        assert_eq!(req.date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn test_create_request_date_is_optional() {
        let req: CreateSaleRequest = serde_json::from_value(json!({
            "customerId": 4,
            "amount": 10,
        }))
        .unwrap();
        assert!(req.date.is_none());
    }

    #[test]
    fn test_sale_response_serializes_with_customer() {
        let sale = Sale {
            id: SaleId::new(1),
            customer_id: CustomerId::new(4),
            amount: Money::parse(Decimal::new(2500, 2)).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: created_at(),
        };
        let customer = CustomerRefResponse {
            id: CustomerId::new(4),
            name: "Ada Lovelace".to_owned(),
            email: Email::parse("ada@example.com").unwrap().into_inner(),
        };

        let value = serde_json::to_value(SaleResponse::new(sale, Some(customer))).unwrap();
        assert_eq!(value["customerId"], json!(4));
        assert_eq!(value["amount"], json!(25.0));
        assert_eq!(value["date"], json!("2024-06-01"));
        assert_eq!(value["customer"]["name"], json!("Ada Lovelace"));
    }

    #[test]
    fn test_sale_response_omits_missing_customer() {
        let sale = Sale {
            id: SaleId::new(1),
            customer_id: CustomerId::new(4),
            amount: Money::parse(Decimal::new(2500, 2)).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: created_at(),
        };

        let value = serde_json::to_value(SaleResponse::new(sale, None)).unwrap();
        assert!(value.get("customer").is_none());
    }
}
