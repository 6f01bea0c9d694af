//! Sale domain types.

use chrono::{DateTime, NaiveDate, Utc};
use tally_core::{CustomerId, Email, Money, SaleId};

/// A single monetary transaction attributed to a customer (domain type).
///
/// Sales are append-only: created and read, never updated or deleted
/// (they disappear only when their customer is deleted, via cascade).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Customer this sale belongs to.
    pub customer_id: CustomerId,
    /// Positive monetary amount.
    pub amount: Money,
    /// Calendar day the sale happened on.
    pub sale_date: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Minimal customer data embedded in sale responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRef {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
}

/// A sale joined with its customer.
#[derive(Debug, Clone)]
pub struct SaleWithCustomer {
    pub sale: Sale,
    pub customer: CustomerRef,
}
