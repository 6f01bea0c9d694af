//! Customer CRUD handlers.
//!
//! All endpoints require a bearer token. Listings are paginated and carry
//! each customer's sales embedded, loaded with a single batched query.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{CustomerId, Email, SaleId};

use crate::db::{
    CustomerFilters, CustomerRepository, CustomerUpdate, RepositoryError, SaleRepository,
};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path, Query};
use crate::middleware::CurrentOperator;
use crate::models::{Customer, Sale};
use crate::routes::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
const MIN_NAME_LENGTH: usize = 2;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub birth_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email.into_inner(),
            birth_date: customer.birth_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Compact sale entry embedded in customer responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEntry {
    pub id: SaleId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl From<Sale> for SaleEntry {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            amount: sale.amount.amount(),
            date: sale.sale_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerWithSales {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    pub sales: Vec<SaleEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct CustomerPage {
    pub data: Vec<CustomerWithSales>,
    pub meta: PageMeta,
}

/// `POST /api/customers`
pub async fn create(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerResponse>>)> {
    let name = validate_name(&req.name)?;
    let email = parse_email(&req.email)?;
    let birth_date = parse_date(&req.birth_date)?;

    let customer = CustomerRepository::new(state.pool())
        .create(&name, &email, birth_date)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Validation("Email already in use".to_string())
            }
            other => AppError::Database(other),
        })?;

    tracing::info!(customer_id = %customer.id, "Customer created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            customer.into(),
            "Customer created successfully",
        )),
    ))
}

/// `GET /api/customers`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<CustomerPage>>> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let filters = CustomerFilters {
        name: query.name,
        email: query.email,
    };

    let (customers, total) = CustomerRepository::new(state.pool())
        .list(&filters, page, limit)
        .await?;

    let ids: Vec<CustomerId> = customers.iter().map(|c| c.id).collect();
    let sales = SaleRepository::new(state.pool())
        .by_customer_ids(&ids)
        .await?;

    let mut by_customer: HashMap<CustomerId, Vec<SaleEntry>> = HashMap::new();
    for sale in sales {
        by_customer
            .entry(sale.customer_id)
            .or_default()
            .push(SaleEntry::from(sale));
    }

    let data = customers
        .into_iter()
        .map(|customer| {
            let sales = by_customer.remove(&customer.id).unwrap_or_default();
            CustomerWithSales {
                customer: customer.into(),
                sales,
            }
        })
        .collect();

    Ok(Json(ApiResponse::data(CustomerPage {
        data,
        meta: PageMeta {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        },
    })))
}

/// `GET /api/customers/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<CustomerId>,
) -> Result<Json<ApiResponse<CustomerWithSales>>> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(customer_not_found)?;

    let sales = SaleRepository::new(state.pool()).by_customer(id).await?;

    Ok(Json(ApiResponse::data(CustomerWithSales {
        customer: customer.into(),
        sales: sales.into_iter().map(SaleEntry::from).collect(),
    })))
}

/// `PUT /api/customers/{id}`
pub async fn update(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<CustomerId>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<CustomerResponse>>> {
    let mut update = CustomerUpdate::default();
    if let Some(name) = req.name {
        update.name = Some(validate_name(&name)?);
    }
    if let Some(email) = req.email {
        update.email = Some(parse_email(&email)?);
    }
    if let Some(date) = req.birth_date {
        update.birth_date = Some(parse_date(&date)?);
    }

    let repo = CustomerRepository::new(state.pool());

    // An empty body is a no-op, not an error
    let customer = if update.is_empty() {
        repo.get_by_id(id).await?.ok_or_else(customer_not_found)?
    } else {
        repo.update(id, &update).await.map_err(|e| match e {
            RepositoryError::NotFound => customer_not_found(),
            RepositoryError::Conflict(_) => {
                AppError::Validation("Email already in use".to_string())
            }
            other => AppError::Database(other),
        })?
    };

    Ok(Json(ApiResponse::with_message(
        customer.into(),
        "Customer updated successfully",
    )))
}

/// `DELETE /api/customers/{id}`
pub async fn remove(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<CustomerId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = CustomerRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(customer_not_found());
    }

    tracing::info!(customer_id = %id, "Customer deleted");

    Ok(Json(ApiResponse::message("Customer deleted successfully")))
}

fn customer_not_found() -> AppError {
    AppError::NotFound("Customer not found".to_string())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.len() < MIN_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_owned())
}

fn parse_email(email: &str) -> Result<Email> {
    Email::parse(email).map_err(|e| AppError::Validation(e.to_string()))
}

/// Parse a `YYYY-MM-DD` date string.
fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use tally_core::Money;

    use super::*;

    fn customer() -> Customer {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Customer {
            id: CustomerId::new(3),
            name: "Ada Lovelace".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_customer_with_sales_serializes_flat() {
        let body = CustomerWithSales {
            customer: customer().into(),
            sales: vec![SaleEntry {
                id: SaleId::new(9),
                amount: Money::parse(Decimal::new(15050, 2)).unwrap().amount(),
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            }],
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["id"], json!(3));
        assert_eq!(value["name"], json!("Ada Lovelace"));
        assert_eq!(value["birthDate"], json!("1990-12-10"));
        assert_eq!(value["sales"][0]["amount"], json!(150.5));
        assert_eq!(value["sales"][0]["date"], json!("2024-03-02"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_date("31/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_validate_name_trims_and_checks_length() {
        assert_eq!(validate_name("  Ada  ").unwrap(), "Ada");
        assert!(validate_name("A").is_err());
        assert!(validate_name("   ").is_err());
    }
}
