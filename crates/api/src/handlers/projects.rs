//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use hrx_core::error::CoreError;
use hrx_core::finance::Totals;
use hrx_core::types::DbId;
use hrx_db::models::project::{CreateProject, Project, UpdateProject};
use hrx_db::repositories::ProjectRepo;
use hrx_geo::Address;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Statuses an admin may move a project into.
const PROJECT_STATUSES: &[&str] = &["new", "in_progress", "finalized", "cancelled"];

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/projects
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    if let Some(status) = &query.status {
        if !PROJECT_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown project status '{status}'"
            ))));
        }
    }
    let projects = ProjectRepo::list(
        &state.pool,
        query.status.as_deref(),
        query.limit.unwrap_or(50).clamp(1, 200),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
///
/// Creates a project. Venue coordinates are resolved best-effort; a failed
/// geocoding lookup never fails the create.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if let Some(margin) = input.profit_margin {
        validate_margin(margin)?;
    }
    if input.event_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "event_name is required".into(),
        )));
    }

    let coords = state
        .geocoder
        .geocode_best_effort(&Address {
            street: Some(input.venue_address.clone()),
            city: input.venue_city.clone(),
            state: input.venue_state.clone(),
            zip_code: input.venue_zip.clone(),
            ..Default::default()
        })
        .await;

    let project = ProjectRepo::create(
        &state.pool,
        &input,
        Some(admin.user_id),
        coords.map(|c| c.latitude),
        coords.map(|c| c.longitude),
    )
    .await?;

    tracing::info!(
        project_id = project.id,
        project_number = %project.project_number,
        "Created project"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}
///
/// Updates status, margin, or notes. A margin change recomputes the derived
/// totals in the same transaction.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(status) = &input.status {
        if !PROJECT_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown project status '{status}'"
            ))));
        }
    }
    if let Some(margin) = input.profit_margin {
        validate_margin(margin)?;
    }

    let mut tx = state.pool.begin().await?;
    let mut project = ProjectRepo::update(&mut *tx, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    if input.profit_margin.is_some() {
        ProjectRepo::recompute_totals(&mut *tx, id).await?;
        // Re-read inside the transaction so the response carries the
        // recomputed totals.
        project = ProjectRepo::find_by_id_conn(&mut *tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id })?;
    }
    tx.commit().await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/recalculate
///
/// Forces a rollup recompute. Normally redundant, but it repairs drift after
/// manual database interventions.
pub async fn recalculate(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Totals>>> {
    let mut tx = state.pool.begin().await?;
    ProjectRepo::find_by_id_conn(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    let totals = ProjectRepo::recompute_totals(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(Json(DataResponse { data: totals }))
}

fn validate_margin(margin: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&margin) {
        return Err(AppError::Core(CoreError::Validation(
            "profit_margin must be between 0 and 100".into(),
        )));
    }
    Ok(())
}
