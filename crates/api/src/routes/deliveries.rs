//! Route definitions for the `/deliveries` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::deliveries;
use crate::state::AppState;

/// Routes mounted at `/deliveries`.
///
/// ```text
/// GET   /                 -> list (admins all, suppliers their own)
/// POST  /                 -> create (admin)
/// GET   /{id}             -> get (owner or admin)
/// PATCH /{id}/status      -> status transition (owner or admin)
/// GET   /{id}/location    -> location history
/// POST  /{id}/location    -> record location ping (in transit only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(deliveries::list).post(deliveries::create))
        .route("/{id}", get(deliveries::get))
        .route("/{id}/status", patch(deliveries::update_status))
        .route(
            "/{id}/location",
            get(deliveries::location_history).post(deliveries::record_location),
        )
}
