//! Operator domain types.

use chrono::{DateTime, Utc};
use tally_core::{Email, OperatorId};

/// An operator account (domain type).
///
/// Operators log into the API to manage customers and sales. The password
/// hash never leaves the db layer; this type is safe to expose to handlers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Operator {
    /// Unique operator ID.
    pub id: OperatorId,
    /// Display name.
    pub name: String,
    /// Operator's email address (unique).
    pub email: Email,
    /// When the operator registered.
    pub created_at: DateTime<Utc>,
    /// When the operator was last updated.
    pub updated_at: DateTime<Utc>,
}
