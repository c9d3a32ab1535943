//! Handlers for the `/deliveries` resource.
//!
//! Admins see and manage everything; a supplier user only the deliveries
//! assigned to them. Status changes run through the state machine and an
//! atomic compare-and-set, so concurrent transitions surface as conflicts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use hrx_core::delivery::{self, DeliveryStatus};
use hrx_core::error::CoreError;
use hrx_core::types::DbId;
use hrx_db::models::delivery::{CreateDelivery, Delivery, LocationPoint, LocationUpdate, UpdateDeliveryStatus};
use hrx_db::repositories::{DeliveryRepo, ProjectRepo, SupplierRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/deliveries
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Delivery>>>> {
    let scope = if user.is_admin() { None } else { Some(user.user_id) };
    let deliveries = DeliveryRepo::list(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: deliveries }))
}

/// POST /api/v1/deliveries
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDelivery>,
) -> AppResult<(StatusCode, Json<DataResponse<Delivery>>)> {
    if input.destination_address.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "destination_address is required".into(),
        )));
    }
    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id: input.project_id })?;
    SupplierRepo::find_by_id(&state.pool, input.supplier_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Supplier", id: input.supplier_id })?;

    let delivery = DeliveryRepo::create(&state.pool, &input).await?;
    tracing::info!(delivery_id = delivery.id, project_id = delivery.project_id, "Created delivery");
    Ok((StatusCode::CREATED, Json(DataResponse { data: delivery })))
}

/// GET /api/v1/deliveries/{id}
pub async fn get(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Delivery>>> {
    let delivery = find_authorized(&state, &user, id).await?;
    Ok(Json(DataResponse { data: delivery }))
}

/// PATCH /api/v1/deliveries/{id}/status
pub async fn update_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDeliveryStatus>,
) -> AppResult<Json<DataResponse<Delivery>>> {
    let delivery = find_authorized(&state, &user, id).await?;

    let current = parse_status(&delivery.status)?;
    let next = DeliveryStatus::parse(&input.status).ok_or_else(|| {
        CoreError::Validation(format!("Unknown delivery status '{}'", input.status))
    })?;
    delivery::validate_transition(current, next)?;

    let updated =
        DeliveryRepo::transition_status(&state.pool, id, current, next, input.notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Delivery status changed concurrently; reload and retry".into(),
                ))
            })?;

    tracing::info!(
        delivery_id = id,
        from = current.as_str(),
        to = next.as_str(),
        "Delivery status transition"
    );

    if next == DeliveryStatus::Delivered {
        notify::notify_admins(
            &state.pool,
            "delivery_completed",
            "normal",
            "Delivery completed",
            &format!("Delivery #{id} arrived at {}", updated.destination_address),
            Some(id),
            Some("delivery"),
        )
        .await;
    }

    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/deliveries/{id}/location
pub async fn location_history(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LocationPoint>>>> {
    find_authorized(&state, &user, id).await?;
    let points = DeliveryRepo::location_history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: points }))
}

/// POST /api/v1/deliveries/{id}/location
///
/// Accepts a location ping while the delivery is in transit.
pub async fn record_location(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(ping): Json<LocationUpdate>,
) -> AppResult<Json<DataResponse<Delivery>>> {
    let delivery = find_authorized(&state, &user, id).await?;
    delivery::validate_location_update(parse_status(&delivery.status)?)?;

    let coords = hrx_geo::Coordinates {
        latitude: ping.latitude,
        longitude: ping.longitude,
    };
    if !coords.is_valid() {
        return Err(AppError::Core(CoreError::Validation(
            "latitude/longitude out of range".into(),
        )));
    }

    let updated = DeliveryRepo::record_location(&state.pool, id, &ping)
        .await?
        .ok_or(CoreError::NotFound { entity: "Delivery", id })?;
    Ok(Json(DataResponse { data: updated }))
}

/// Look up a delivery and enforce owner-or-admin access.
async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Delivery, AppError> {
    let delivery = DeliveryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Delivery", id })?;
    if !user.is_admin() && delivery.supplier_user_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this delivery".into(),
        )));
    }
    Ok(delivery)
}

fn parse_status(status: &str) -> Result<DeliveryStatus, AppError> {
    DeliveryStatus::parse(status).ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "Unknown delivery status '{status}' in database"
        )))
    })
}
