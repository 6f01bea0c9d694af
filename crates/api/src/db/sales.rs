//! Sale repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use tally_core::{CustomerId, Email, Money, SaleId};

use super::RepositoryError;
use crate::models::{CustomerRef, Sale, SaleWithCustomer};

/// Flat row for sale+customer joins.
#[derive(sqlx::FromRow)]
struct SaleCustomerRow {
    id: SaleId,
    customer_id: CustomerId,
    amount: Money,
    sale_date: NaiveDate,
    created_at: DateTime<Utc>,
    customer_name: String,
    customer_email: Email,
}

impl From<SaleCustomerRow> for SaleWithCustomer {
    fn from(row: SaleCustomerRow) -> Self {
        Self {
            sale: Sale {
                id: row.id,
                customer_id: row.customer_id,
                amount: row.amount,
                sale_date: row.sale_date,
                created_at: row.created_at,
            },
            customer: CustomerRef {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
            },
        }
    }
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a new sale for a customer.
    ///
    /// The customer must exist; the caller checks this first so a miss can
    /// surface as a 404 rather than a raw foreign-key violation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        amount: Money,
        sale_date: NaiveDate,
    ) -> Result<Sale, RepositoryError> {
        let sale = sqlx::query_as::<_, Sale>(
            r"
            INSERT INTO sale (customer_id, amount, sale_date)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, amount, sale_date, created_at
            ",
        )
        .bind(customer_id)
        .bind(amount)
        .bind(sale_date)
        .fetch_one(self.pool)
        .await?;

        Ok(sale)
    }

    /// All sales, newest first, each joined with its customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all_with_customer(&self) -> Result<Vec<SaleWithCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleCustomerRow>(
            r"
            SELECT s.id, s.customer_id, s.amount, s.sale_date, s.created_at,
                   c.name AS customer_name, c.email AS customer_email
            FROM sale s
            JOIN customer c ON c.id = s.customer_id
            ORDER BY s.sale_date DESC, s.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleWithCustomer::from).collect())
    }

    /// All sales for one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_customer(&self, customer_id: CustomerId) -> Result<Vec<Sale>, RepositoryError> {
        let sales = sqlx::query_as::<_, Sale>(
            r"
            SELECT id, customer_id, amount, sale_date, created_at
            FROM sale
            WHERE customer_id = $1
            ORDER BY sale_date DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }

    /// All sales belonging to any of the given customers.
    ///
    /// Used to embed sales into paginated customer listings with a single
    /// query instead of one per customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_customer_ids(
        &self,
        customer_ids: &[CustomerId],
    ) -> Result<Vec<Sale>, RepositoryError> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = customer_ids.iter().map(|id| id.as_i32()).collect();

        let sales = sqlx::query_as::<_, Sale>(
            r"
            SELECT id, customer_id, amount, sale_date, created_at
            FROM sale
            WHERE customer_id = ANY($1)
            ORDER BY sale_date DESC, id DESC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales within an optional date range, newest first.
    ///
    /// Both bounds are inclusive; `None` leaves that side unbounded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn in_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Sale>, RepositoryError> {
        let sales = sqlx::query_as::<_, Sale>(
            r"
            SELECT id, customer_id, amount, sale_date, created_at
            FROM sale
            WHERE ($1::date IS NULL OR sale_date >= $1)
              AND ($2::date IS NULL OR sale_date <= $2)
            ORDER BY sale_date DESC, id DESC
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }
}
