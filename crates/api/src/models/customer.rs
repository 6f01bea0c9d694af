//! Customer domain types.

use chrono::{DateTime, NaiveDate, Utc};
use tally_core::{CustomerId, Email};

/// A tracked customer (domain type).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Customer's email address (unique).
    pub email: Email,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}
