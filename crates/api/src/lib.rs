//! Orbital relay server library.
//!
//! Exposes the building blocks (config, state, error handling, adapters,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod adapter;
pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
