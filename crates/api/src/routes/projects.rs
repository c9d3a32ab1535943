//! Route definitions for `/projects` and its nested resources.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{equipment, projects, quotations, team};
use crate::state::AppState;

/// Routes mounted at `/projects` (all admin-only).
///
/// ```text
/// GET    /                                        -> list
/// POST   /                                        -> create
/// GET    /{id}                                    -> get
/// PATCH  /{id}                                    -> update status/margin
/// POST   /{id}/recalculate                        -> force totals recompute
/// GET    /{id}/team                               -> list staffing lines
/// POST   /{id}/team                               -> add staffing line
/// PATCH  /{id}/team/{member_id}                   -> update staffing line
/// DELETE /{id}/team/{member_id}                   -> remove staffing line
/// POST   /{id}/team/{member_id}/invite            -> issue invitation
/// GET    /{id}/equipment                          -> list equipment lines
/// POST   /{id}/equipment                          -> add equipment line
/// DELETE /{id}/equipment/{equipment_id}           -> remove equipment line
/// POST   /{id}/request-quotes                     -> fan out quotations
/// GET    /{id}/quotations                         -> list quotations
/// POST   /{id}/quotations/{quotation_id}/accept   -> accept quotation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get).patch(projects::update))
        .route("/{id}/recalculate", post(projects::recalculate))
        .route("/{id}/team", get(team::list).post(team::create))
        .route(
            "/{id}/team/{member_id}",
            patch(team::update).delete(team::delete),
        )
        .route("/{id}/team/{member_id}/invite", post(team::invite))
        .route("/{id}/equipment", get(equipment::list).post(equipment::create))
        .route("/{id}/equipment/{equipment_id}", delete(equipment::delete))
        .route("/{id}/request-quotes", post(quotations::request_quotes))
        .route("/{id}/quotations", get(quotations::list))
        .route(
            "/{id}/quotations/{quotation_id}/accept",
            post(quotations::accept),
        )
}
