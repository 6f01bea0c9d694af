//! Customer repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use tally_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::Customer;

/// Optional case-insensitive substring filters for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilters {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Partial update for a customer. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub birth_date: Option<NaiveDate>,
}

impl CustomerUpdate {
    /// Whether the update would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.birth_date.is_none()
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        birth_date: NaiveDate,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO customer (name, email, birth_date)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, birth_date, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(birth_date)
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

        Ok(customer)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, email, birth_date, created_at, updated_at
            FROM customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// List customers, newest first, with optional filters and pagination.
    ///
    /// Filters are case-insensitive substring matches. Returns the page of
    /// customers along with the total count matching the filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filters: &CustomerFilters,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Customer>, i64), RepositoryError> {
        let name_pattern = filters.name.as_ref().map(|n| format!("%{n}%"));
        let email_pattern = filters.email.as_ref().map(|e| format!("%{e}%"));
        let offset = (page - 1) * limit;

        let customers = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, email, birth_date, created_at, updated_at
            FROM customer
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR email ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(&name_pattern)
        .bind(&email_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM customer
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR email ILIKE $2)
            ",
        )
        .bind(&name_pattern)
        .bind(&email_pattern)
        .fetch_one(self.pool)
        .await?;

        Ok((customers, total))
    }

    /// List all customers in insertion order, for statistics scans.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, email, birth_date, created_at, updated_at
            FROM customer
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Apply a partial update to a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is already in use.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            UPDATE customer
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                birth_date = COALESCE($4, birth_date),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, birth_date, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.birth_date)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already in use".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        customer.ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer (their sales cascade).
    ///
    /// # Returns
    ///
    /// Returns `true` if the customer was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
