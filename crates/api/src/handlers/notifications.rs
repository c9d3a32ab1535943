//! Handlers for the `/notifications` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use hrx_core::error::CoreError;
use hrx_core::types::DbId;
use hrx_db::models::notification::Notification;
use hrx_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

/// GET /api/v1/notifications
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        user.user_id,
        query.unread_only,
        query.limit.unwrap_or(50).clamp(1, 200),
    )
    .await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// Unread count payload.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: UnreadCount { count } }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let changed = NotificationRepo::mark_read(&state.pool, id, user.user_id).await?;
    if !changed {
        return Err(AppError::Core(CoreError::NotFound { entity: "Notification", id }));
    }
    Ok(Json(DataResponse { data: serde_json::json!({ "read": true }) }))
}

/// Result payload for the bulk read endpoint.
#[derive(Debug, Serialize)]
pub struct ReadAllResult {
    pub updated: u64,
}

/// POST /api/v1/notifications/read-all
pub async fn read_all(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReadAllResult>>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: ReadAllResult { updated } }))
}
