//! Bearer token authentication extractor.
//!
//! Protected handlers take a [`CurrentOperator`] argument. Extraction reads
//! the `Authorization: Bearer <token>` header and verifies the token against
//! the configured signing keys. Any failure rejects the request with a 401
//! and the body `{"success": false, "error": "Invalid or missing token"}`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use tally_core::OperatorId;

use crate::error::{self, AppError};
use crate::state::AppState;

/// The operator identified by the request's bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentOperator(operator): CurrentOperator,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", operator.email)
/// }
/// ```
pub struct CurrentOperator(pub AuthenticatedOperator);

/// Identity carried in a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedOperator {
    pub id: OperatorId,
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentOperator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        let claims = state.jwt().verify(token).map_err(|_| unauthorized())?;

        error::set_sentry_user(&claims.sub, Some(&claims.email));

        Ok(Self(AuthenticatedOperator {
            id: claims.sub,
            email: claims.email,
        }))
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Invalid or missing token".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use chrono::Utc;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    use tally_core::Email;

    use crate::config::ApiConfig;
    use crate::models::Operator;

    use super::*;

    const SECRET: &str = "k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e";

    fn test_state() -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/tally_test".to_owned()),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from(SECRET.to_owned()),
            jwt_expiry_hours: 24,
            allowed_origins: vec![],
            sentry_dsn: None,
            sentry_environment: None,
        };
        // connect_lazy never touches the network
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/tally_test")
            .unwrap();
        AppState::new(config, pool)
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/customers");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    fn issue_token(state: &AppState) -> String {
        let now = Utc::now();
        let operator = Operator {
            id: OperatorId::new(7),
            name: "Test Operator".to_owned(),
            email: Email::parse("operator@example.com").unwrap(),
            created_at: now,
            updated_at: now,
        };
        state.jwt().issue(&operator).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_operator_from_valid_token() {
        let state = test_state();
        let token = issue_token(&state);
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));

        let CurrentOperator(operator) =
            CurrentOperator::from_request_parts(&mut parts, &state)
                .await
                .unwrap();
        assert_eq!(operator.id, OperatorId::new(7));
        assert_eq!(operator.email, "operator@example.com");
    }

    #[tokio::test]
    async fn test_rejects_missing_header() {
        let state = test_state();
        let mut parts = parts_with_auth(None);

        let result = CurrentOperator::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_rejects_non_bearer_scheme() {
        let state = test_state();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));

        let result = CurrentOperator::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_rejects_garbage_token() {
        let state = test_state();
        let mut parts = parts_with_auth(Some("Bearer not.a.token"));

        let result = CurrentOperator::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
