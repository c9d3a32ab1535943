//! Route definitions for the `/professionals` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::professionals;
use crate::state::AppState;

/// Routes mounted at `/professionals`.
///
/// ```text
/// POST /  -> register a professional (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(professionals::create))
}
