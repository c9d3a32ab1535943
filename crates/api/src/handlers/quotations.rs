//! Handlers for the admin side of the quotation flow: fan-out and acceptance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use hrx_core::error::CoreError;
use hrx_core::finance::allocate_quote_cost;
use hrx_core::tokens::generate_token;
use hrx_core::types::DbId;
use hrx_db::models::quotation::{Quotation, RequestQuotes};
use hrx_db::repositories::{EquipmentRepo, ProjectRepo, QuotationRepo, SupplierRepo};
use hrx_email::templates::{self, QuoteDecision, QuoteRequest};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default token validity for a quote request.
const DEFAULT_QUOTE_DAYS: i64 = 7;

/// One equipment line snapshotted into `requested_items` at fan-out time.
/// The snapshot, not the live table, is what the supplier prices and what
/// acceptance allocates costs against.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestedItem {
    pub equipment_id: DbId,
    pub equipment_type: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub duration_days: i32,
}

/// POST /api/v1/projects/{id}/request-quotes
///
/// Creates one `sent` quotation per supplier, each with its own single-use
/// token, and emails every supplier a link to the public pricing form.
pub async fn request_quotes(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<RequestQuotes>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Quotation>>>)> {
    if input.supplier_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one supplier is required".into(),
        )));
    }
    if input.equipment_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one equipment item is required".into(),
        )));
    }
    let valid_days = input.valid_days.unwrap_or(DEFAULT_QUOTE_DAYS);
    if !(1..=90).contains(&valid_days) {
        return Err(AppError::Core(CoreError::Validation(
            "valid_days must be between 1 and 90".into(),
        )));
    }

    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;

    let suppliers = SupplierRepo::list_by_ids(&state.pool, &input.supplier_ids).await?;
    if suppliers.len() != input.supplier_ids.len() {
        return Err(AppError::Core(CoreError::Validation(
            "One or more suppliers do not exist".into(),
        )));
    }

    let valid_until = Utc::now() + Duration::days(valid_days);

    let mut tx = state.pool.begin().await?;
    let lines = EquipmentRepo::list_by_ids(&mut *tx, project_id, &input.equipment_ids).await?;
    if lines.len() != input.equipment_ids.len() {
        return Err(AppError::Core(CoreError::Validation(
            "One or more equipment items do not belong to this project".into(),
        )));
    }
    let snapshot: Vec<RequestedItem> = lines
        .iter()
        .map(|line| RequestedItem {
            equipment_id: line.id,
            equipment_type: line.equipment_type.clone(),
            description: line.description.clone(),
            quantity: line.quantity,
            duration_days: line.duration_days,
        })
        .collect();
    let requested_items = serde_json::to_value(&snapshot)
        .map_err(|e| AppError::InternalError(format!("Snapshot serialization error: {e}")))?;

    let mut created = Vec::with_capacity(suppliers.len());
    for supplier in &suppliers {
        let token = generate_token();
        let quotation = QuotationRepo::create(
            &mut *tx,
            project_id,
            supplier.id,
            &token,
            &requested_items,
            valid_until,
        )
        .await?;
        created.push((quotation, token, supplier));
    }
    tx.commit().await?;

    let item_summary = snapshot
        .iter()
        .map(|item| format!("{}x {} ({} day(s))", item.quantity, item.equipment_type, item.duration_days))
        .collect::<Vec<_>>()
        .join(", ");

    for (quotation, token, supplier) in &created {
        let message = templates::quote_request(&QuoteRequest {
            contact_name: supplier.contact_name.clone(),
            company_name: supplier.company_name.clone(),
            project_number: project.project_number.clone(),
            event_name: project.event_name.clone(),
            event_date: project.event_date.clone(),
            venue_city: project.venue_city.clone(),
            venue_state: project.venue_state.clone(),
            item_summary: item_summary.clone(),
            quote_url: format!("{}/quotation/{token}", state.config.public_base_url),
            valid_until: Some(valid_until),
        });
        notify::queue_email(
            &state,
            &supplier.email,
            "supplier",
            "quote_request",
            message,
            Some(quotation.id),
            Some("quotation"),
        )
        .await;
    }

    tracing::info!(
        project_id,
        suppliers = created.len(),
        items = snapshot.len(),
        "Fanned out quote requests"
    );

    let quotations = created.into_iter().map(|(q, _, _)| q).collect();
    Ok((StatusCode::CREATED, Json(DataResponse { data: quotations })))
}

/// GET /api/v1/projects/{id}/quotations
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Quotation>>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
    let quotations = QuotationRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: quotations }))
}

/// POST /api/v1/projects/{id}/quotations/{quotation_id}/accept
///
/// Accepts one submitted quotation: links the quoted equipment lines to it
/// with allocated costs, rejects the open siblings, and recomputes the
/// rollup, all in one transaction. Decision emails go out after commit.
pub async fn accept(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, quotation_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Quotation>>> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
    QuotationRepo::find_by_id(&state.pool, quotation_id)
        .await?
        .filter(|q| q.project_id == project_id)
        .ok_or(CoreError::NotFound { entity: "Quotation", id: quotation_id })?;

    // Remember which siblings are still open so the rejection notices after
    // commit go to exactly the suppliers this acceptance shut out.
    let open_siblings: Vec<(DbId, DbId)> = QuotationRepo::list_for_project(&state.pool, project_id)
        .await?
        .into_iter()
        .filter(|q| q.id != quotation_id && matches!(q.status.as_str(), "sent" | "submitted"))
        .map(|q| (q.id, q.supplier_id))
        .collect();

    let mut tx = state.pool.begin().await?;
    let accepted = QuotationRepo::accept(&mut *tx, quotation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Only submitted quotations can be accepted".into(),
            ))
        })?;

    let items: Vec<RequestedItem> = serde_json::from_value(accepted.requested_items.clone())
        .map_err(|e| AppError::InternalError(format!("Corrupt requested_items snapshot: {e}")))?;
    let total_price = accepted.total_price.ok_or_else(|| {
        AppError::InternalError("Accepted quotation has no total_price".into())
    })?;

    let lines: Vec<(i32, i32)> = items
        .iter()
        .map(|item| (item.quantity, item.duration_days))
        .collect();
    let costs = allocate_quote_cost(
        total_price,
        accepted.delivery_fee,
        accepted.setup_fee,
        accepted.daily_rate,
        &lines,
    );
    for (item, cost) in items.iter().zip(costs) {
        EquipmentRepo::apply_accepted_quote(&mut *tx, item.equipment_id, quotation_id, cost)
            .await?;
    }

    let rejected = QuotationRepo::reject_siblings(&mut *tx, project_id, quotation_id).await?;
    ProjectRepo::recompute_totals(&mut *tx, project_id).await?;
    tx.commit().await?;

    tracing::info!(project_id, quotation_id, rejected, "Accepted quotation");

    // Decision emails, best effort.
    if let Some(winner) = SupplierRepo::find_by_id(&state.pool, accepted.supplier_id).await? {
        let message = templates::quote_accepted(&QuoteDecision {
            contact_name: winner.contact_name.clone(),
            company_name: winner.company_name.clone(),
            project_number: project.project_number.clone(),
            event_name: project.event_name.clone(),
        });
        notify::queue_email(
            &state,
            &winner.email,
            "supplier",
            "quote_accepted",
            message,
            Some(quotation_id),
            Some("quotation"),
        )
        .await;
    }
    for (sibling_id, supplier_id) in open_siblings {
        let Some(supplier) = SupplierRepo::find_by_id(&state.pool, supplier_id).await? else {
            continue;
        };
        let message = templates::quote_rejected(&QuoteDecision {
            contact_name: supplier.contact_name.clone(),
            company_name: supplier.company_name.clone(),
            project_number: project.project_number.clone(),
            event_name: project.event_name.clone(),
        });
        notify::queue_email(
            &state,
            &supplier.email,
            "supplier",
            "quote_rejected",
            message,
            Some(sibling_id),
            Some("quotation"),
        )
        .await;
    }

    Ok(Json(DataResponse { data: accepted }))
}
