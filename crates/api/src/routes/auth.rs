//! Registration and login handlers.

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::OperatorId;

use crate::error::Result;
use crate::extract::Json;
use crate::models::Operator;
use crate::routes::ApiResponse;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Operator representation on the wire. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorResponse {
    pub id: OperatorId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Operator> for OperatorResponse {
    fn from(operator: Operator) -> Self {
        Self {
            id: operator.id,
            name: operator.name,
            email: operator.email.into_inner(),
            created_at: operator.created_at,
            updated_at: operator.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub user: OperatorResponse,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OperatorResponse>>)> {
    let service = AuthService::new(state.pool(), state.jwt());
    let operator = service
        .register(&req.name, &req.email, &req.password)
        .await?;

    tracing::info!(operator_id = %operator.id, "Operator registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            operator.into(),
            "User created successfully",
        )),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>> {
    let service = AuthService::new(state.pool(), state.jwt());
    let (operator, token) = service.login(&req.email, &req.password).await?;

    tracing::info!(operator_id = %operator.id, "Operator logged in");

    Ok(Json(ApiResponse::with_message(
        LoginData {
            token,
            user: operator.into(),
        },
        "Login successful",
    )))
}
