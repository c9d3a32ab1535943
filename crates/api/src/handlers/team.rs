//! Handlers for `/projects/{id}/team` and the invitation issuing flow.
//!
//! Every write that touches a staffing line recomputes the project rollup
//! inside the same transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use hrx_core::error::CoreError;
use hrx_core::finance::line_total;
use hrx_core::tokens::generate_token;
use hrx_core::types::DbId;
use hrx_db::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};
use hrx_db::repositories::{ProfessionalRepo, ProjectRepo, TeamRepo};
use hrx_email::templates::{self, TeamInvitation};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default invitation validity when the admin does not pick a deadline.
const DEFAULT_INVITATION_DAYS: i64 = 7;

/// GET /api/v1/projects/{id}/team
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    ensure_project(&state, project_id).await?;
    let members = TeamRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/projects/{id}/team
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMember>>)> {
    ensure_project(&state, project_id).await?;
    validate_line(input.quantity, input.daily_rate, input.duration_days)?;
    if input.professional_id.is_none() && input.external_name.as_deref().unwrap_or("").is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Either professional_id or external_name is required".into(),
        )));
    }
    if let Some(professional_id) = input.professional_id {
        ProfessionalRepo::find_by_id(&state.pool, professional_id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Professional", id: professional_id })?;
    }

    let total_cost = line_total(input.daily_rate, input.quantity, input.duration_days);
    let mut tx = state.pool.begin().await?;
    let member = TeamRepo::create(&mut *tx, project_id, &input, total_cost).await?;
    ProjectRepo::recompute_totals(&mut *tx, project_id).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PATCH /api/v1/projects/{id}/team/{member_id}
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    let current = find_member(&state, project_id, member_id).await?;

    let quantity = input.quantity.unwrap_or(current.quantity);
    let daily_rate = input.daily_rate.unwrap_or(current.daily_rate);
    let duration_days = input.duration_days.unwrap_or(current.duration_days);
    validate_line(quantity, daily_rate, duration_days)?;
    let total_cost = line_total(daily_rate, quantity, duration_days);

    let mut tx = state.pool.begin().await?;
    let member = TeamRepo::update(&mut *tx, member_id, &input, total_cost)
        .await?
        .ok_or(CoreError::NotFound { entity: "Team member", id: member_id })?;
    ProjectRepo::recompute_totals(&mut *tx, project_id).await?;
    tx.commit().await?;

    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/projects/{id}/team/{member_id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_member(&state, project_id, member_id).await?;

    let mut tx = state.pool.begin().await?;
    let removed = TeamRepo::delete(&mut *tx, member_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Team member",
            id: member_id,
        }));
    }
    ProjectRepo::recompute_totals(&mut *tx, project_id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request body for the invite endpoint. The body is optional; an absent or
/// empty body uses the default validity.
#[derive(Debug, Default, Deserialize)]
pub struct InviteRequest {
    pub valid_days: Option<i64>,
}

/// POST /api/v1/projects/{id}/team/{member_id}/invite
///
/// Issues (or re-issues) a single-use invitation token and emails the linked
/// professional. Lines staffed by an external name have nobody to email and
/// are rejected.
pub async fn invite(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
    body: Option<Json<InviteRequest>>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    let member = find_member(&state, project_id, member_id).await?;
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;

    let professional_id = member.professional_id.ok_or_else(|| {
        CoreError::Validation("Cannot invite a team line without a linked professional".into())
    })?;
    let professional = ProfessionalRepo::find_by_id(&state.pool, professional_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Professional", id: professional_id })?;

    let valid_days = body
        .map(|Json(b)| b.valid_days.unwrap_or(DEFAULT_INVITATION_DAYS))
        .unwrap_or(DEFAULT_INVITATION_DAYS);
    if !(1..=90).contains(&valid_days) {
        return Err(AppError::Core(CoreError::Validation(
            "valid_days must be between 1 and 90".into(),
        )));
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::days(valid_days);
    let issued =
        TeamRepo::issue_invitation(&state.pool, member_id, &token, expires_at).await?;
    if !issued {
        return Err(AppError::Core(CoreError::Conflict(
            "This invitation was already decided".into(),
        )));
    }

    let message = templates::team_invitation(&TeamInvitation {
        professional_name: professional.full_name.clone(),
        role: member.role.clone(),
        event_name: project.event_name.clone(),
        event_date: project.event_date.clone(),
        venue_city: project.venue_city.clone(),
        venue_state: project.venue_state.clone(),
        daily_rate: member.daily_rate,
        duration_days: member.duration_days,
        invitation_url: format!("{}/convite/{token}", state.config.public_base_url),
        expires_at: Some(expires_at),
    });
    notify::queue_email(
        &state,
        &professional.email,
        "professional",
        "team_invitation",
        message,
        Some(member_id),
        Some("team_member"),
    )
    .await;

    let member = TeamRepo::find_by_id(&state.pool, member_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Team member", id: member_id })?;
    Ok(Json(DataResponse { data: member }))
}

async fn ensure_project(state: &AppState, project_id: DbId) -> Result<(), AppError> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
    Ok(())
}

/// Look up a team line, requiring that it belong to the routed project.
async fn find_member(
    state: &AppState,
    project_id: DbId,
    member_id: DbId,
) -> Result<TeamMember, AppError> {
    let member = TeamRepo::find_by_id(&state.pool, member_id)
        .await?
        .filter(|m| m.project_id == project_id)
        .ok_or(CoreError::NotFound { entity: "Team member", id: member_id })?;
    Ok(member)
}

fn validate_line(quantity: i32, daily_rate: f64, duration_days: i32) -> Result<(), AppError> {
    if quantity <= 0 || duration_days <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "quantity and duration_days must be positive".into(),
        )));
    }
    if daily_rate < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "daily_rate must not be negative".into(),
        )));
    }
    Ok(())
}
