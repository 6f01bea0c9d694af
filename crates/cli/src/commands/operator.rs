//! Operator account management commands.
//!
//! # Usage
//!
//! ```bash
//! tally-cli operator create -e admin@example.com -n "Admin Name" -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use thiserror::Error;

use tally_api::db::{OperatorRepository, RepositoryError, create_pool};
use tally_api::services::auth::hash_password;
use tally_core::Email;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_NAME_LENGTH: usize = 2;

/// Errors that can occur during operator management.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid name.
    #[error("Invalid name: must be at least {MIN_NAME_LENGTH} characters")]
    InvalidName,

    /// Password too weak.
    #[error("Invalid password: must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Operator already exists.
    #[error("Operator already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new operator account.
///
/// # Returns
///
/// The ID of the created operator.
///
/// # Errors
///
/// Returns an error if validation fails, the database is unreachable, or an
/// operator with the email already exists.
pub async fn create(email: &str, name: &str, password: &str) -> Result<i32, OperatorError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| OperatorError::InvalidEmail(e.to_string()))?;
    let name = name.trim();
    if name.len() < MIN_NAME_LENGTH {
        return Err(OperatorError::InvalidName);
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(OperatorError::WeakPassword);
    }

    let database_url =
        super::database_url().ok_or(OperatorError::MissingEnvVar("TALLY_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    let password_hash = hash_password(password).map_err(|_| OperatorError::PasswordHash)?;

    tracing::info!("Creating operator: {} ({})", name, email);
    let operator = OperatorRepository::new(&pool)
        .create(name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => OperatorError::UserExists(email.to_string()),
            other => OperatorError::Repository(other),
        })?;

    tracing::info!("Operator created with ID {}", operator.id);
    Ok(operator.id.as_i32())
}
