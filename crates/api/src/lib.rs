//! Tally API library.
//!
//! This crate provides the API functionality as a library,
//! allowing it to be tested and reused (the CLI reuses the
//! repositories and auth service for seeding and operator creation).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
