//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret. Claims carry
//! the operator's ID and email so protected handlers can identify the
//! caller without a database round-trip.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tally_core::OperatorId;

use super::AuthError;
use crate::models::Operator;

/// JWT claims for an authenticated operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator ID.
    pub sub: OperatorId,
    /// Operator email, for logging and Sentry user context.
    pub email: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Signing and verification keys derived from the configured secret.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl JwtKeys {
    /// Derive keys from the shared secret.
    #[must_use]
    pub fn new(secret: &SecretString, expiry_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            expiry_hours,
        }
    }

    /// Issue a signed token for an operator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if signing fails (it only can if
    /// the key material is unusable).
    pub fn issue(&self, operator: &Operator) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: operator.id,
            email: operator.email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed, has a
    /// bad signature, or is expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
                .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use tally_core::Email;

    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&SecretString::from(secret.to_owned()), 24)
    }

    fn operator() -> Operator {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Operator {
            id: OperatorId::new(42),
            name: "Test Operator".to_owned(),
            email: Email::parse("operator@example.com").unwrap(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let keys = keys("k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e");
        let token = keys.issue(&operator()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, OperatorId::new(42));
        assert_eq!(claims.email, "operator@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signer = keys("k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e");
        let verifier = keys("f7!jP1@sK6#mV3$qN8%xW2&zD5*cH0^a");

        let token = signer.issue(&operator()).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let keys = keys("k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e");
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(keys.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expiry_honors_configuration() {
        let keys = JwtKeys::new(
            &SecretString::from("k9#mQ2$vL8@nX4!pR6&wZ0*uT5^yB3%e".to_owned()),
            1,
        );
        let token = keys.issue(&operator()).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
