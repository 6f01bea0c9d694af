//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::JwtKeys;

/// Shared application state available to all request handlers.
///
/// Cloning is cheap; the inner state is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    jwt: JwtKeys,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_expiry_hours);
        Self {
            inner: Arc::new(AppStateInner { config, pool, jwt }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// The Postgres connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Token signing and verification keys.
    #[must_use]
    pub fn jwt(&self) -> &JwtKeys {
        &self.inner.jwt
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    #[tokio::test]
    async fn test_config_survives_state_construction() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/tally_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4100,
            jwt_secret: SecretString::from("k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e"),
            jwt_expiry_hours: 24,
            allowed_origins: vec!["http://localhost:5173".to_owned()],
            sentry_dsn: None,
            sentry_environment: None,
        };
        // connect_lazy never touches the network
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/tally_test")
            .unwrap();

        let state = AppState::new(config, pool);
        let clone = state.clone();

        assert_eq!(clone.config().socket_addr().port(), 4100);
        assert_eq!(
            clone.config().allowed_origins,
            vec!["http://localhost:5173".to_owned()]
        );
    }
}
