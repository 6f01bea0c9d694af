//! Statistics handlers.
//!
//! Unlike the CRUD endpoints, these return their payloads bare, without
//! the success envelope.

use axum::extract::State;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::CustomerId;

use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::CurrentOperator;
use crate::services::StatisticsService;
use crate::services::statistics::{DailyTotal, TopCustomers};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyTotalResponse {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<DailyTotal> for DailyTotalResponse {
    fn from(entry: DailyTotal) -> Self {
        Self {
            date: entry.date,
            total: entry.total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeLeader {
    pub client_id: Option<CustomerId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageLeader {
    pub client_id: Option<CustomerId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyLeader {
    pub client_id: Option<CustomerId>,
    pub name: String,
    pub frequency: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomersResponse {
    pub highest_volume: VolumeLeader,
    pub highest_average: AverageLeader,
    pub highest_frequency: FrequencyLeader,
}

impl From<TopCustomers> for TopCustomersResponse {
    fn from(top: TopCustomers) -> Self {
        Self {
            highest_volume: match top.highest_volume {
                Some(leader) => VolumeLeader {
                    client_id: Some(leader.customer_id),
                    name: leader.name,
                    total: leader.total,
                },
                None => VolumeLeader {
                    client_id: None,
                    name: String::new(),
                    total: Decimal::ZERO,
                },
            },
            highest_average: match top.highest_average {
                Some(leader) => AverageLeader {
                    client_id: Some(leader.customer_id),
                    name: leader.name,
                    average: leader.average,
                },
                None => AverageLeader {
                    client_id: None,
                    name: String::new(),
                    average: Decimal::ZERO,
                },
            },
            highest_frequency: match top.highest_frequency {
                Some(leader) => FrequencyLeader {
                    client_id: Some(leader.customer_id),
                    name: leader.name,
                    frequency: leader.frequency,
                },
                None => FrequencyLeader {
                    client_id: None,
                    name: String::new(),
                    frequency: 0,
                },
            },
        }
    }
}

/// `GET /api/statistics/daily-sales`
pub async fn daily_sales(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Query(query): Query<DailyRangeQuery>,
) -> Result<Json<Vec<DailyTotalResponse>>> {
    let start = query.start_date.as_deref().map(parse_date).transpose()?;
    let end = query.end_date.as_deref().map(parse_date).transpose()?;

    let totals = StatisticsService::new(state.pool())
        .daily_sales(start, end)
        .await?;

    Ok(Json(
        totals.into_iter().map(DailyTotalResponse::from).collect(),
    ))
}

/// `GET /api/statistics/top-customers`
pub async fn top_customers(
    State(state): State<AppState>,
    _operator: CurrentOperator,
) -> Result<Json<TopCustomersResponse>> {
    let top = StatisticsService::new(state.pool()).top_customers().await?;

    Ok(Json(top.into()))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".to_string()))
}
