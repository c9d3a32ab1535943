//! Admin-only handlers: bulk CSV import, registry review, dashboard counts,
//! and the email audit endpoints.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use hrx_core::csv_import::{
    ClientRow, ImportKind, ImportReport, ProfessionalRow, Record, SupplierRow,
};
use hrx_core::error::CoreError;
use hrx_core::types::DbId;
use hrx_db::models::email_log::EmailLog;
use hrx_db::models::professional::{CreateProfessional, Professional};
use hrx_db::models::project::CreateProject;
use hrx_db::models::supplier::{CreateSupplier, Supplier};
use hrx_db::repositories::{
    DeliveryRepo, EmailLogRepo, ProfessionalRepo, ProjectRepo, SupplierRepo,
};
use hrx_email::templates::{self, ProfessionalNotice, TEMPLATE_NAMES};
use hrx_geo::Address;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::notify;
use crate::rate_limit::{client_key, BULK_IMPORT_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bulk CSV import
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/bulk-import
///
/// Multipart form: `type` (one of the legacy kind names) and `file` (CSV
/// with a header row). Rows are processed independently; one bad row is
/// recorded and skipped, never aborting the batch.
pub async fn bulk_import(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let client = client_key(&headers);
    state
        .rate_limiter
        .check("bulk-import", &client, BULK_IMPORT_LIMIT)
        .map_err(|retry_after_secs| AppError::RateLimited { retry_after_secs })?;

    let mut kind: Option<ImportKind> = None;
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("type") => {
                let value = field.text().await?;
                kind = Some(ImportKind::parse(value.trim()).ok_or_else(|| {
                    CoreError::Validation(format!("Unknown import type '{value}'"))
                })?);
            }
            Some("file") => {
                file = Some(field.bytes().await?.to_vec());
            }
            _ => {}
        }
    }
    let kind = kind.ok_or_else(|| CoreError::Validation("Missing 'type' field".into()))?;
    let file = file.ok_or_else(|| CoreError::Validation("Missing 'file' field".into()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CoreError::Validation(format!("Invalid CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut report = ImportReport::default();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                report.record_failure(row, format!("Malformed CSV row: {e}"));
                continue;
            }
        };
        let record: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();

        let outcome = match kind {
            ImportKind::Professionals => import_professional(&state, &record).await,
            ImportKind::Clients => import_client(&state, admin.user_id, &record).await,
            ImportKind::Suppliers => import_supplier(&state, &record).await,
        };
        match outcome {
            Ok(()) => report.record_success(),
            Err(e) => report.record_failure(row, e.to_string()),
        }
    }

    tracing::info!(
        kind = kind.as_str(),
        imported = report.imported,
        failed = report.failed,
        "Bulk import finished"
    );
    Ok(Json(DataResponse { data: report }))
}

async fn import_professional(state: &AppState, record: &Record) -> Result<(), AppError> {
    let row = ProfessionalRow::from_record(record)?;
    if ProfessionalRepo::exists_by_cpf_or_email(&state.pool, &row.cpf, &row.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Duplicate CPF or email".into(),
        )));
    }

    let coords = state
        .geocoder
        .geocode_best_effort(&Address {
            street: row.street.clone(),
            number: row.number.clone(),
            neighborhood: row.neighborhood.clone(),
            city: row.city.clone(),
            state: row.state.clone(),
            zip_code: (!row.cep.is_empty()).then(|| row.cep.clone()),
        })
        .await;

    let input = CreateProfessional {
        full_name: row.full_name,
        cpf: row.cpf,
        email: row.email,
        phone: row.phone,
        birth_date: row.birth_date,
        cep: row.cep,
        street: row.street,
        number: row.number,
        complement: row.complement,
        neighborhood: row.neighborhood,
        city: row.city,
        state: row.state,
        categories: row.categories,
        availability: row.availability,
        has_experience: row.has_experience,
        years_of_experience: row.years_of_experience,
        experience_description: row.experience_description,
        service_radius_km: Some(row.service_radius_km),
    };
    ProfessionalRepo::create(
        &state.pool,
        &input,
        coords.map(|c| c.latitude),
        coords.map(|c| c.longitude),
    )
    .await?;
    Ok(())
}

async fn import_client(
    state: &AppState,
    admin_id: DbId,
    record: &Record,
) -> Result<(), AppError> {
    let row = ClientRow::from_record(record)?;

    let coords = state
        .geocoder
        .geocode_best_effort(&Address {
            street: Some(row.venue_address.clone()),
            city: row.venue_city.clone(),
            state: row.venue_state.clone(),
            zip_code: row.venue_zip.clone(),
            ..Default::default()
        })
        .await;

    let input = CreateProject {
        client_name: row.client_name,
        client_email: row.client_email,
        client_phone: row.client_phone,
        client_company: row.client_company,
        client_cnpj: row.client_cnpj,
        event_name: row.event_name,
        event_type: row.event_type,
        event_description: row.event_description,
        event_date: row.event_date,
        start_time: row.start_time,
        end_time: row.end_time,
        expected_attendance: row.expected_attendance,
        venue_name: row.venue_name,
        venue_address: row.venue_address,
        venue_city: row.venue_city,
        venue_state: row.venue_state,
        venue_zip: row.venue_zip,
        budget_range: row.budget_range,
        client_budget: row.client_budget,
        is_urgent: row.is_urgent,
        additional_notes: row.additional_notes,
        profit_margin: Some(ClientRow::DEFAULT_PROFIT_MARGIN),
    };
    ProjectRepo::create(
        &state.pool,
        &input,
        Some(admin_id),
        coords.map(|c| c.latitude),
        coords.map(|c| c.longitude),
    )
    .await?;
    Ok(())
}

async fn import_supplier(state: &AppState, record: &Record) -> Result<(), AppError> {
    let row = SupplierRow::from_record(record)?;
    if SupplierRepo::exists_by_email_or_cnpj(&state.pool, &row.email, &row.cnpj).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Duplicate email or CNPJ".into(),
        )));
    }

    let coords = match (&row.city, &row.state) {
        (Some(city), Some(st)) => {
            state
                .geocoder
                .geocode_best_effort(&Address {
                    street: row.address.clone(),
                    city: city.clone(),
                    state: st.clone(),
                    zip_code: (!row.zip_code.is_empty()).then(|| row.zip_code.clone()),
                    ..Default::default()
                })
                .await
        }
        _ => None,
    };

    let input = CreateSupplier {
        company_name: row.company_name,
        legal_name: row.legal_name,
        contact_name: row.contact_name,
        email: row.email,
        phone: row.phone,
        cnpj: row.cnpj,
        address: row.address,
        city: row.city,
        state: row.state,
        zip_code: row.zip_code,
        equipment_types: row.equipment_types,
        delivery_radius_km: Some(row.delivery_radius_km),
        shipping_fee_per_km: Some(row.shipping_fee_per_km),
    };
    SupplierRepo::create(
        &state.pool,
        &input,
        coords.map(|c| c.latitude),
        coords.map(|c| c.longitude),
    )
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Registry review
// ---------------------------------------------------------------------------

/// Query parameters for the registry list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/admin/professionals
pub async fn list_professionals(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Professional>>>> {
    let professionals = ProfessionalRepo::list(
        &state.pool,
        query.status.as_deref(),
        query.limit.unwrap_or(50).clamp(1, 200),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(DataResponse { data: professionals }))
}

/// POST /api/v1/admin/professionals/{id}/approve
///
/// Approves a pending registration and emails the professional.
pub async fn approve_professional(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Professional>>> {
    ProfessionalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Professional", id })?;

    let professional = ProfessionalRepo::decide(&state.pool, id, "approved")
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This registration was already decided".into(),
            ))
        })?;

    let message = templates::professional_approved(&ProfessionalNotice {
        full_name: professional.full_name.clone(),
    });
    notify::queue_email(
        &state,
        &professional.email,
        "professional",
        "professional_approved",
        message,
        Some(id),
        Some("professional"),
    )
    .await;

    Ok(Json(DataResponse { data: professional }))
}

/// GET /api/v1/admin/suppliers
pub async fn list_suppliers(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Supplier>>>> {
    let suppliers = SupplierRepo::list(
        &state.pool,
        query.status.as_deref(),
        query.limit.unwrap_or(50).clamp(1, 200),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(DataResponse { data: suppliers }))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dashboard/counts
pub async fn dashboard_counts(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let projects = ProjectRepo::count_by_status(&state.pool).await?;
    let professionals = ProfessionalRepo::count_by_status(&state.pool).await?;
    let deliveries = DeliveryRepo::count_by_status(&state.pool).await?;
    let suppliers = SupplierRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: json!({
            "projects": counts_to_map(projects),
            "professionals": counts_to_map(professionals),
            "deliveries": counts_to_map(deliveries),
            "suppliers": suppliers,
        }),
    }))
}

fn counts_to_map(counts: Vec<(String, i64)>) -> serde_json::Map<String, serde_json::Value> {
    counts
        .into_iter()
        .map(|(status, count)| (status, json!(count)))
        .collect()
}

// ---------------------------------------------------------------------------
// Email audit
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/emails/history`.
#[derive(Debug, Deserialize)]
pub struct EmailHistoryQuery {
    pub status: Option<String>,
    pub recipient: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/admin/emails/history
pub async fn email_history(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<EmailHistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<EmailLog>>>> {
    if let Some(status) = &query.status {
        if !matches!(status.as_str(), "pending" | "sent" | "failed") {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown email status '{status}'"
            ))));
        }
    }
    let logs = EmailLogRepo::history(
        &state.pool,
        query.status.as_deref(),
        query.recipient.as_deref(),
        query.limit.unwrap_or(50).clamp(1, 200),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(DataResponse { data: logs }))
}

/// Query parameters for `GET /admin/emails/preview`.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub template: String,
}

/// GET /api/v1/admin/emails/preview?template=<name>
///
/// Renders a template against mock data so admins can see what recipients
/// get, without sending anything.
pub async fn email_preview(
    _admin: RequireAdmin,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let message = templates::preview(&query.template).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown template '{}'. Available: {}",
            query.template,
            TEMPLATE_NAMES.join(", ")
        ))
    })?;
    Ok(Json(DataResponse {
        data: json!({
            "template": query.template,
            "subject": message.subject,
            "html": message.html,
        }),
    }))
}
