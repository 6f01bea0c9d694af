//! Seed the database with demo data.
//!
//! Inserts two operator accounts, a handful of customers, and a couple of
//! weeks of sales so the statistics endpoints have something to aggregate.
//! Safe to run repeatedly: existing operators and customers are reused, and
//! customers that already have sales are not given more.
//!
//! # Environment Variables
//!
//! - `TALLY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use tally_api::db::{
    CustomerFilters, CustomerRepository, RepositoryError, SaleRepository, create_pool,
};
use tally_api::models::Customer;
use tally_api::services::auth::hash_password;
use tally_core::{Email, Money};

const DEMO_PASSWORD: &str = "Kq8v!mZ2rX5t";

/// Seed operators, customers, and sales.
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url().ok_or("TALLY_DATABASE_URL not set")?;

    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    // Operators
    for (name, email) in [
        ("Admin", "admin@tally.local"),
        ("Manager", "manager@tally.local"),
    ] {
        seed_operator(&pool, name, email).await?;
    }
    info!("Demo operators use the password {DEMO_PASSWORD}");

    // Customers, oldest birth date first
    let customers = [
        ("Alice Turner", "alice@example.com", ymd(1985, 4, 12)?),
        ("Bruno Costa", "bruno@example.com", ymd(1992, 11, 3)?),
        ("Carla Mendes", "carla@example.com", ymd(1978, 7, 25)?),
        ("Diego Ramos", "diego@example.com", ymd(2000, 1, 30)?),
    ];

    let customer_repo = CustomerRepository::new(&pool);
    let sale_repo = SaleRepository::new(&pool);
    let today = Utc::now().date_naive();

    for (index, (name, email, birth_date)) in customers.into_iter().enumerate() {
        let email = Email::parse(email)?;
        let customer = ensure_customer(&customer_repo, name, &email, birth_date).await?;

        if !sale_repo.by_customer(customer.id).await?.is_empty() {
            info!(customer = name, "Customer already has sales, skipping");
            continue;
        }

        // Spread each customer's sales over the last two weeks
        for offset in 0..4_u64 {
            let days_ago = offset * 3 + index as u64;
            let date = today
                .checked_sub_days(Days::new(days_ago))
                .ok_or("sale date out of range")?;
            let cents = 1_500 + (index as i64 + 1) * 750 * (offset as i64 + 1);
            let amount = Money::parse(Decimal::new(cents, 2))?;
            sale_repo.create(customer.id, amount, date).await?;
        }
        info!(customer = name, "Seeded sales");
    }

    info!("Seeding complete!");
    Ok(())
}

async fn seed_operator(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let password_hash = hash_password(DEMO_PASSWORD).map_err(|e| e.to_string())?;

    match tally_api::db::OperatorRepository::new(pool)
        .create(name, &email, &password_hash)
        .await
    {
        Ok(operator) => info!(%email, id = %operator.id, "Operator created"),
        Err(RepositoryError::Conflict(_)) => info!(%email, "Operator already exists"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Create the customer, or look it up by email if it already exists.
async fn ensure_customer(
    repo: &CustomerRepository<'_>,
    name: &str,
    email: &Email,
    birth_date: NaiveDate,
) -> Result<Customer, Box<dyn std::error::Error>> {
    match repo.create(name, email, birth_date).await {
        Ok(customer) => Ok(customer),
        Err(RepositoryError::Conflict(_)) => {
            let filters = CustomerFilters {
                name: None,
                email: Some(email.to_string()),
            };
            let (mut found, _) = repo.list(&filters, 1, 1).await?;
            found
                .pop()
                .ok_or_else(|| format!("customer {email} exists but was not found").into())
        }
        Err(e) => Err(e.into()),
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| "invalid date".into())
}
