//! Sales statistics.
//!
//! Two aggregations over the sales data:
//!
//! - **Daily totals**: group sales by calendar day and sum the amounts,
//!   newest day first, capped at 30 days.
//! - **Top customers**: per-customer total, average, and unique-active-day
//!   count, reduced to the single highest customer per metric. Only
//!   customers with at least one sale participate; ties keep the
//!   first-encountered customer (insertion order).
//!
//! The reductions are pure functions over in-memory lists so they can be
//! tested without a database.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use tally_core::CustomerId;

use crate::db::{CustomerRepository, RepositoryError, SaleRepository};

/// Maximum number of days returned by the daily totals aggregation.
const MAX_DAILY_ENTRIES: usize = 30;

/// Revenue total for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Per-customer sales aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRollup {
    pub customer_id: CustomerId,
    pub name: String,
    /// Sum of all sale amounts.
    pub total: Decimal,
    /// Mean sale amount.
    pub average: Decimal,
    /// Number of distinct days with at least one sale.
    pub frequency: usize,
}

/// The highest customer for each metric. `None` when no customer has sales.
#[derive(Debug, Clone, Default)]
pub struct TopCustomers {
    pub highest_volume: Option<CustomerRollup>,
    pub highest_average: Option<CustomerRollup>,
    pub highest_frequency: Option<CustomerRollup>,
}

/// Group dated amounts by day and sum, preserving first-encountered day order.
///
/// The input comes from the repository ordered by date descending, so the
/// output days are newest first. At most [`MAX_DAILY_ENTRIES`] days are kept.
#[must_use]
pub fn summarize_daily(sales: &[(NaiveDate, Decimal)]) -> Vec<DailyTotal> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut totals: HashMap<NaiveDate, Decimal> = HashMap::new();

    for &(date, amount) in sales {
        if let Some(total) = totals.get_mut(&date) {
            *total += amount;
        } else {
            order.push(date);
            totals.insert(date, amount);
        }
    }

    order
        .into_iter()
        .take(MAX_DAILY_ENTRIES)
        .map(|date| DailyTotal {
            date,
            total: totals.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}

/// Compute per-customer aggregates and pick the highest per metric.
///
/// `customers` is scanned in order; a strict greater-than comparison keeps
/// the first-encountered customer on ties. Customers without sales are
/// skipped entirely.
#[must_use]
pub fn rank_customers(
    customers: &[(CustomerId, String)],
    sales_by_customer: &HashMap<CustomerId, Vec<(NaiveDate, Decimal)>>,
) -> TopCustomers {
    let mut top = TopCustomers::default();

    for (customer_id, name) in customers {
        let Some(sales) = sales_by_customer.get(customer_id) else {
            continue;
        };
        if sales.is_empty() {
            continue;
        }

        let total: Decimal = sales.iter().map(|&(_, amount)| amount).sum();
        let average = total / Decimal::from(sales.len());
        let frequency = sales
            .iter()
            .map(|&(date, _)| date)
            .collect::<HashSet<_>>()
            .len();

        let rollup = CustomerRollup {
            customer_id: *customer_id,
            name: name.clone(),
            total,
            average,
            frequency,
        };

        if top
            .highest_volume
            .as_ref()
            .is_none_or(|best| rollup.total > best.total)
        {
            top.highest_volume = Some(rollup.clone());
        }
        if top
            .highest_average
            .as_ref()
            .is_none_or(|best| rollup.average > best.average)
        {
            top.highest_average = Some(rollup.clone());
        }
        if top
            .highest_frequency
            .as_ref()
            .is_none_or(|best| rollup.frequency > best.frequency)
        {
            top.highest_frequency = Some(rollup);
        }
    }

    top
}

/// Statistics service backed by the customer and sale repositories.
pub struct StatisticsService<'a> {
    customers: CustomerRepository<'a>,
    sales: SaleRepository<'a>,
}

impl<'a> StatisticsService<'a> {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            sales: SaleRepository::new(pool),
        }
    }

    /// Daily revenue totals within an optional inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn daily_sales(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyTotal>, RepositoryError> {
        let sales = self.sales.in_range(start, end).await?;
        let dated: Vec<(NaiveDate, Decimal)> = sales
            .iter()
            .map(|sale| (sale.sale_date, sale.amount.amount()))
            .collect();

        Ok(summarize_daily(&dated))
    }

    /// The highest customer by volume, average, and frequency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn top_customers(&self) -> Result<TopCustomers, RepositoryError> {
        let customers = self.customers.list_all().await?;
        let customer_ids: Vec<CustomerId> = customers.iter().map(|c| c.id).collect();
        let sales = self.sales.by_customer_ids(&customer_ids).await?;

        let mut by_customer: HashMap<CustomerId, Vec<(NaiveDate, Decimal)>> = HashMap::new();
        for sale in &sales {
            by_customer
                .entry(sale.customer_id)
                .or_default()
                .push((sale.sale_date, sale.amount.amount()));
        }

        let scan_order: Vec<(CustomerId, String)> = customers
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(rank_customers(&scan_order, &by_customer))
    }
}
