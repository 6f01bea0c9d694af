//! Operator repository for database operations.

use sqlx::PgPool;

use tally_core::Email;

use super::RepositoryError;
use crate::models::Operator;

/// Row shape for queries that also need the password hash.
///
/// Kept private so the hash never leaves this module except through
/// [`OperatorRepository::get_password_hash`].
#[derive(sqlx::FromRow)]
struct OperatorAuthRow {
    id: tally_core::OperatorId,
    name: String,
    email: Email,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OperatorAuthRow {
    fn split(self) -> (Operator, String) {
        (
            Operator {
                id: self.id,
                name: self.name,
                email: self.email,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for operator database operations.
pub struct OperatorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OperatorRepository<'a> {
    /// Create a new operator repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an operator by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Operator>, RepositoryError> {
        let operator = sqlx::query_as::<_, Operator>(
            r"
            SELECT id, name, email, created_at, updated_at
            FROM operator
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(operator)
    }

    /// Create a new operator with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Operator, RepositoryError> {
        let operator = sqlx::query_as::<_, Operator>(
            r"
            INSERT INTO operator (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(operator)
    }

    /// Get an operator's password hash by email.
    ///
    /// Returns `None` if no operator has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Operator, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, OperatorAuthRow>(
            r"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM operator
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(OperatorAuthRow::split))
    }
}
