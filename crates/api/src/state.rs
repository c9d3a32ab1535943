use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hrx_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Producer handle for the outbound email queue.
    pub email: hrx_email::EmailQueue,
    /// Best-effort geocoder.
    pub geocoder: Arc<hrx_geo::Geocoder>,
    /// In-memory rate limiter for the public and import endpoints.
    pub rate_limiter: Arc<RateLimiter>,
}
