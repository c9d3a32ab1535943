//! Route definitions for the `/admin` tooling.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (all admin-only).
///
/// ```text
/// POST /bulk-import                 -> CSV import (rate-limited)
/// GET  /professionals               -> list registrations
/// POST /professionals/{id}/approve  -> approve registration
/// GET  /suppliers                   -> list suppliers
/// GET  /dashboard/counts            -> reporting counts
/// GET  /emails/history              -> dispatch audit trail
/// GET  /emails/preview              -> render template with mock data
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bulk-import", post(admin::bulk_import))
        .route("/professionals", get(admin::list_professionals))
        .route(
            "/professionals/{id}/approve",
            post(admin::approve_professional),
        )
        .route("/suppliers", get(admin::list_suppliers))
        .route("/dashboard/counts", get(admin::dashboard_counts))
        .route("/emails/history", get(admin::email_history))
        .route("/emails/preview", get(admin::email_preview))
}
