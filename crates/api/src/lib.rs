//! HRX API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! rate limiting) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod state;
