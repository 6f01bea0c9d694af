//! Domain models for the API.
//!
//! These types represent validated domain objects separate from the wire
//! format; route handlers convert them into response DTOs.

pub mod customer;
pub mod operator;
pub mod sale;

pub use customer::Customer;
pub use operator::Operator;
pub use sale::{CustomerRef, Sale, SaleWithCustomer};
