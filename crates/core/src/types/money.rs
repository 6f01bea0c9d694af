//! Monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MoneyError {
    /// The amount is zero or negative.
    #[error("amount must be positive")]
    NotPositive,
    /// The amount carries more than two decimal places.
    #[error("amount cannot have more than {max} decimal places")]
    TooPrecise {
        /// Maximum allowed decimal places.
        max: u32,
    },
}

/// A positive monetary amount.
///
/// Sale amounts are stored as `NUMERIC(12,2)` in the database; this type
/// enforces the same constraints at the edge: strictly positive, at most
/// two decimal places.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use tally_core::Money;
///
/// assert!(Money::parse(Decimal::new(1999, 2)).is_ok()); // 19.99
/// assert!(Money::parse(Decimal::ZERO).is_err());
/// assert!(Money::parse(Decimal::new(-500, 2)).is_err());
/// assert!(Money::parse(Decimal::new(12345, 4)).is_err()); // 1.2345
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Maximum number of decimal places.
    pub const MAX_SCALE: u32 = 2;

    /// Validate a decimal as a monetary amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NotPositive`] if the amount is zero or negative,
    /// or [`MoneyError::TooPrecise`] if it has more than two decimal places.
    pub fn parse(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }

        if amount.normalize().scale() > Self::MAX_SCALE {
            return Err(MoneyError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }

        Ok(Self(amount))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid (NUMERIC(12,2) CHECK amount > 0)
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        let money = Money::parse(Decimal::new(10050, 2)).unwrap();
        assert_eq!(money.amount(), Decimal::new(10050, 2));
    }

    #[test]
    fn test_parse_whole_number() {
        assert!(Money::parse(Decimal::from(100)).is_ok());
    }

    #[test]
    fn test_parse_zero() {
        assert!(matches!(
            Money::parse(Decimal::ZERO),
            Err(MoneyError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(
            Money::parse(Decimal::new(-1, 2)),
            Err(MoneyError::NotPositive)
        ));
    }

    #[test]
    fn test_parse_too_precise() {
        assert!(matches!(
            Money::parse(Decimal::new(12345, 4)),
            Err(MoneyError::TooPrecise { .. })
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        // 1.2300 normalizes to 1.23
        assert!(Money::parse(Decimal::new(12300, 4)).is_ok());
    }

    #[test]
    fn test_display_two_places() {
        let money = Money::parse(Decimal::from(5)).unwrap();
        assert_eq!(money.to_string(), "5.00");
    }
}
