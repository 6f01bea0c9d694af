//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (configured origins)
//! 4. Rate limiting (governor)

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::CurrentOperator;
pub use cors::cors_layer;
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
