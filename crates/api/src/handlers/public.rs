//! Public, token-addressed handlers: the supplier pricing form and the
//! professional invitation response. No authentication; the opaque token is
//! the capability.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use hrx_core::error::CoreError;
use hrx_core::invitation::{self, InvitationAction, InvitationStatus};
use hrx_core::quotation::{ensure_not_expired, QuoteSubmission};
use hrx_core::types::Timestamp;
use hrx_db::models::quotation::PublicQuotation;
use hrx_db::repositories::{ProjectRepo, QuotationRepo, SupplierRepo, TeamRepo, UserRepo};
use hrx_email::templates::{self, QuoteSubmittedAdmin};

use crate::error::{AppError, AppResult};
use crate::notify;
use crate::rate_limit::{client_key, QUOTE_SUBMIT_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Quotations
// ---------------------------------------------------------------------------

/// GET /api/v1/public/quotations/{token}
///
/// The supplier's view of a quote request. Reading a submitted quotation is
/// allowed (the form shows what was sent); an expired token is gone.
pub async fn get_quotation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<PublicQuotation>>> {
    let quotation = QuotationRepo::find_public_by_token(&state.pool, &token)
        .await?
        .ok_or(CoreError::UnknownToken("quotation"))?;
    ensure_not_expired(quotation.valid_until, Utc::now())?;
    Ok(Json(DataResponse { data: quotation }))
}

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: String,
    pub submitted_at: Option<Timestamp>,
}

/// POST /api/v1/public/quotations/{token}
///
/// Records the supplier's pricing. Rate limited per client; the
/// `sent -> submitted` transition is atomic, so a concurrent double submit
/// gets a 409.
pub async fn submit_quotation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Json(submission): Json<QuoteSubmission>,
) -> AppResult<Json<DataResponse<SubmitResponse>>> {
    let client = client_key(&headers);
    state
        .rate_limiter
        .check("quote-submit", &client, QUOTE_SUBMIT_LIMIT)
        .map_err(|retry_after_secs| AppError::RateLimited { retry_after_secs })?;

    let quotation = QuotationRepo::find_by_token(&state.pool, &token)
        .await?
        .ok_or(CoreError::UnknownToken("quotation"))?;
    ensure_not_expired(quotation.valid_until, Utc::now())?;
    submission.validate()?;

    let submitted = QuotationRepo::submit(&state.pool, quotation.id, &submission)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This quotation was already submitted".into(),
            ))
        })?;

    tracing::info!(
        quotation_id = submitted.id,
        project_id = submitted.project_id,
        "Supplier submitted quotation"
    );

    // Tell the admins, in-app and by email. Both are best effort.
    let project = ProjectRepo::find_by_id(&state.pool, submitted.project_id).await?;
    let supplier = SupplierRepo::find_by_id(&state.pool, submitted.supplier_id).await?;
    if let (Some(project), Some(supplier)) = (project, supplier) {
        notify::notify_admins(
            &state.pool,
            "quote_submitted",
            "high",
            "New quote submitted",
            &format!(
                "{} submitted a quote for {} ({})",
                supplier.company_name, project.project_number, project.event_name
            ),
            Some(submitted.id),
            Some("quotation"),
        )
        .await;

        let message = templates::quote_submitted_admin(&QuoteSubmittedAdmin {
            company_name: supplier.company_name.clone(),
            project_number: project.project_number.clone(),
            event_name: project.event_name.clone(),
            total_price: submission.total_price,
            project_url: format!(
                "{}/admin/projects/{}",
                state.config.public_base_url, project.id
            ),
        });
        match UserRepo::admin_emails(&state.pool).await {
            Ok(emails) => {
                for email in emails {
                    notify::queue_email(
                        &state,
                        &email,
                        "admin",
                        "quote_submitted_admin",
                        message.clone(),
                        Some(submitted.id),
                        Some("quotation"),
                    )
                    .await;
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to resolve admin emails"),
        }
    }

    Ok(Json(DataResponse {
        data: SubmitResponse {
            status: submitted.status,
            submitted_at: submitted.submitted_at,
        },
    }))
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

/// What the public confirmation page needs to render an invitation.
#[derive(Debug, Serialize)]
pub struct InvitationInfo {
    pub status: String,
    pub role: String,
    pub daily_rate: f64,
    pub duration_days: i32,
    pub token_expires_at: Option<Timestamp>,
    pub event_name: String,
    pub event_date: Option<String>,
    pub venue_city: String,
    pub venue_state: String,
}

/// GET /api/v1/professional/confirm/{token}
pub async fn invitation_info(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<InvitationInfo>>> {
    let member = TeamRepo::find_by_token(&state.pool, &token)
        .await?
        .ok_or(CoreError::UnknownToken("invitation"))?;
    let project = ProjectRepo::find_by_id(&state.pool, member.project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: member.project_id })?;

    Ok(Json(DataResponse {
        data: InvitationInfo {
            status: member.status,
            role: member.role,
            daily_rate: member.daily_rate,
            duration_days: member.duration_days,
            token_expires_at: member.token_expires_at,
            event_name: project.event_name,
            event_date: project.event_date,
            venue_city: project.venue_city,
            venue_state: project.venue_state,
        },
    }))
}

/// Query parameters for the invitation response endpoint.
#[derive(Debug, Deserialize)]
pub struct RespondQuery {
    pub action: String,
}

/// Response body after deciding an invitation.
#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub status: String,
}

/// POST /api/v1/professional/confirm/{token}?action=confirm|reject
///
/// Decides an invitation exactly once. The validation ladder runs first for
/// precise error responses; the final `invited -> decided` update is atomic,
/// so racing requests cannot both win.
pub async fn respond_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<RespondQuery>,
) -> AppResult<Json<DataResponse<RespondResponse>>> {
    let action = InvitationAction::parse(&query.action).ok_or_else(|| {
        CoreError::Validation("action must be 'confirm' or 'reject'".into())
    })?;

    let member = TeamRepo::find_by_token(&state.pool, &token)
        .await?
        .ok_or(CoreError::UnknownToken("invitation"))?;
    let project = ProjectRepo::find_by_id(&state.pool, member.project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: member.project_id })?;

    let status = InvitationStatus::parse(&member.status).ok_or_else(|| {
        CoreError::Internal(format!("Unknown invitation status '{}'", member.status))
    })?;
    invitation::validate_response(
        status,
        member.token_expires_at,
        Utc::now(),
        project.status == "cancelled",
    )?;

    let target = action.target_status();
    let decided = TeamRepo::decide_invitation(
        &state.pool,
        member.id,
        target.as_str(),
        target == InvitationStatus::Confirmed,
    )
    .await?;
    if !decided {
        return Err(AppError::Core(CoreError::Conflict(
            "This invitation was already decided".into(),
        )));
    }

    tracing::info!(
        member_id = member.id,
        project_id = member.project_id,
        decision = target.as_str(),
        "Invitation decided"
    );

    notify::notify_admins(
        &state.pool,
        "team_response",
        "normal",
        "Invitation answered",
        &format!(
            "A {} invitation for {} was {}",
            member.role, project.event_name, target.as_str()
        ),
        Some(member.id),
        Some("team_member"),
    )
    .await;

    Ok(Json(DataResponse {
        data: RespondResponse {
            status: target.as_str().to_string(),
        },
    }))
}
