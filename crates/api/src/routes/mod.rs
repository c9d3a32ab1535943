pub mod admin;
pub mod auth;
pub mod deliveries;
pub mod health;
pub mod notifications;
pub mod professionals;
pub mod projects;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
///
/// /professionals                                   register (auth)
/// /professional/confirm/{token}                    invitation info, respond (public)
///
/// /public/quotations/{token}                       quotation view, submit (public)
///
/// /projects                                        list, create (admin)
/// /projects/{id}                                   get, update (admin)
/// /projects/{id}/recalculate                       force totals recompute (POST)
/// /projects/{id}/team                              list, add line
/// /projects/{id}/team/{member_id}                  update, remove
/// /projects/{id}/team/{member_id}/invite           issue invitation (POST)
/// /projects/{id}/equipment                         list, add line
/// /projects/{id}/equipment/{equipment_id}          remove
/// /projects/{id}/request-quotes                    fan out quotations (POST)
/// /projects/{id}/quotations                        list
/// /projects/{id}/quotations/{quotation_id}/accept  accept (POST)
///
/// /deliveries                                      list (role-scoped), create (admin)
/// /deliveries/{id}                                 get (owner or admin)
/// /deliveries/{id}/status                          transition (PATCH)
/// /deliveries/{id}/location                        history (GET), ping (POST)
///
/// /notifications                                   list (?unread_only, limit)
/// /notifications/unread-count                      unread count (GET)
/// /notifications/{id}/read                         mark read (POST)
/// /notifications/read-all                          mark all read (POST)
///
/// /admin/bulk-import                               CSV import (POST, rate-limited)
/// /admin/professionals                             list w/ status filter
/// /admin/professionals/{id}/approve                approve (POST)
/// /admin/suppliers                                 list
/// /admin/dashboard/counts                          reporting counts
/// /admin/emails/history                            dispatch audit trail
/// /admin/emails/preview                            render template w/ mock data
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Professional registration (authenticated).
        .nest("/professionals", professionals::router())
        // Public token-addressed flows: quotations and invitations.
        .nest("/public/quotations", public::quotations_router())
        .nest("/professional/confirm", public::invitations_router())
        // Projects and their nested staffing/equipment/quotation resources.
        .nest("/projects", projects::router())
        // Delivery tracking.
        .nest("/deliveries", deliveries::router())
        // In-app notifications.
        .nest("/notifications", notifications::router())
        // Admin tooling: import, registry review, dashboard, email audit.
        .nest("/admin", admin::router())
}
