//! Route definitions for the public, token-addressed endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public/quotations`.
///
/// ```text
/// GET  /{token}  -> quotation view for the supplier
/// POST /{token}  -> submit pricing (rate-limited)
/// ```
pub fn quotations_router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(public::get_quotation))
        .route("/{token}", post(public::submit_quotation))
}

/// Routes mounted at `/professional/confirm`.
///
/// ```text
/// GET  /{token}          -> invitation info
/// POST /{token}?action=  -> confirm | reject
/// ```
pub fn invitations_router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(public::invitation_info))
        .route("/{token}", post(public::respond_invitation))
}
