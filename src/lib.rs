//! Edumatrix - University records manager
//!
//! This library crate holds the layers around the records store: the login
//! gate, configuration loading, CSV export, and demo-data seeding. It is
//! exposed for integration testing.

pub mod auth;
pub mod config;
pub mod export;
pub mod seed;
