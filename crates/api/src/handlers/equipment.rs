//! Handlers for `/projects/{id}/equipment`.
//!
//! Equipment lines only contribute to the rollup once a quotation covering
//! them is accepted, so creation does not recompute; deletion does, in case
//! the removed line carried an accepted cost.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use hrx_core::error::CoreError;
use hrx_core::types::DbId;
use hrx_db::models::equipment::{CreateEquipmentItem, EquipmentItem};
use hrx_db::repositories::{EquipmentRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/equipment
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EquipmentItem>>>> {
    ensure_project(&state, project_id).await?;
    let items = EquipmentRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/projects/{id}/equipment
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateEquipmentItem>,
) -> AppResult<(StatusCode, Json<DataResponse<EquipmentItem>>)> {
    ensure_project(&state, project_id).await?;
    if input.equipment_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "equipment_type is required".into(),
        )));
    }
    if input.quantity <= 0 || input.duration_days <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "quantity and duration_days must be positive".into(),
        )));
    }

    let item = EquipmentRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// DELETE /api/v1/projects/{id}/equipment/{equipment_id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, equipment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_project(&state, project_id).await?;

    let mut tx = state.pool.begin().await?;
    let removed = EquipmentRepo::delete(&mut *tx, project_id, equipment_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Equipment item",
            id: equipment_id,
        }));
    }
    ProjectRepo::recompute_totals(&mut *tx, project_id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_project(state: &AppState, project_id: DbId) -> Result<(), AppError> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
    Ok(())
}
