//! Authentication service.
//!
//! Provides operator registration, password login, and bearer token
//! issuing/verification.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, JwtKeys};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use tally_core::Email;

use crate::db::RepositoryError;
use crate::db::operators::OperatorRepository;
use crate::models::Operator;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum operator name length.
const MIN_NAME_LENGTH: usize = 2;

/// Authentication service.
///
/// Handles operator registration and login against the `operator` table.
pub struct AuthService<'a> {
    operators: OperatorRepository<'a>,
    keys: &'a JwtKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, keys: &'a JwtKeys) -> Self {
        Self {
            operators: OperatorRepository::new(pool),
            keys,
        }
    }

    /// Register a new operator with name, email, and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidName` if the name is too short.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Operator, AuthError> {
        let email = Email::parse(email)?;
        validate_name(name)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let operator = self
            .operators
            .create(name.trim(), &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(operator)
    }

    /// Login with email and password, returning the operator and a signed token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Operator, String), AuthError> {
        // A malformed email can't belong to any operator
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (operator, password_hash) = self
            .operators
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.keys.issue(&operator)?;

        Ok((operator, token))
    }
}

/// Validate an operator display name.
fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.trim().len() < MIN_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_validate_name_length() {
        assert!(matches!(
            validate_name("A"),
            Err(AuthError::InvalidName(_))
        ));
        assert!(matches!(
            validate_name("  A  "),
            Err(AuthError::InvalidName(_))
        ));
        assert!(validate_name("Al").is_ok());
    }
}
