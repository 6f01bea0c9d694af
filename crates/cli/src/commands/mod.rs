//! CLI command implementations.

pub mod migrate;
pub mod operator;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL from `TALLY_DATABASE_URL` or `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    std::env::var("TALLY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
