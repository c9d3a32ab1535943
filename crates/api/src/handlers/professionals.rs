//! Handler for professional registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use hrx_core::error::CoreError;
use hrx_db::models::professional::{CreateProfessional, Professional};
use hrx_db::repositories::ProfessionalRepo;
use hrx_email::templates::{self, ProfessionalNotice};
use hrx_geo::Address;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/professionals
///
/// Registers a professional in `pending` status. The address is geocoded
/// best-effort, a welcome email is queued, and admins get an in-app
/// notification to review the registration.
pub async fn create(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateProfessional>,
) -> AppResult<(StatusCode, Json<DataResponse<Professional>>)> {
    if input.full_name.trim().is_empty() || input.cpf.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "full_name and cpf are required".into(),
        )));
    }
    if !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email is required".into(),
        )));
    }

    if ProfessionalRepo::exists_by_cpf_or_email(&state.pool, &input.cpf, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A professional with this CPF or email already exists".into(),
        )));
    }

    let coords = state
        .geocoder
        .geocode_best_effort(&Address {
            street: input.street.clone(),
            number: input.number.clone(),
            neighborhood: input.neighborhood.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            zip_code: (!input.cep.is_empty()).then(|| input.cep.clone()),
        })
        .await;

    let professional = ProfessionalRepo::create(
        &state.pool,
        &input,
        coords.map(|c| c.latitude),
        coords.map(|c| c.longitude),
    )
    .await?;

    tracing::info!(professional_id = professional.id, "Registered professional");

    let message = templates::professional_welcome(&ProfessionalNotice {
        full_name: professional.full_name.clone(),
    });
    notify::queue_email(
        &state,
        &professional.email,
        "professional",
        "professional_welcome",
        message,
        Some(professional.id),
        Some("professional"),
    )
    .await;
    notify::notify_admins(
        &state.pool,
        "professional_registered",
        "normal",
        "New professional registration",
        &format!("{} is awaiting review", professional.full_name),
        Some(professional.id),
        Some("professional"),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: professional })))
}
