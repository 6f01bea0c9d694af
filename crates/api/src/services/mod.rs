//! Business logic services.

pub mod auth;
pub mod statistics;

pub use auth::AuthService;
pub use statistics::StatisticsService;
