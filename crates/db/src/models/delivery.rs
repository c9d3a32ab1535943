//! Delivery tracking models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `delivery_trackings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Delivery {
    pub id: DbId,
    pub project_id: DbId,
    pub supplier_id: DbId,
    pub supplier_user_id: Option<DbId>,
    pub status: String,
    pub equipment_description: String,
    pub destination_address: String,
    pub scheduled_pickup_time: Option<Timestamp>,
    pub actual_pickup_time: Option<Timestamp>,
    pub actual_delivery_time: Option<Timestamp>,
    pub delivery_notes: Option<String>,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub current_speed_kmh: Option<f64>,
    pub last_location_update: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `delivery_location_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationPoint {
    pub id: DbId,
    pub delivery_id: DbId,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: Option<f64>,
    pub recorded_at: Timestamp,
}

/// DTO for creating a delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDelivery {
    pub project_id: DbId,
    pub supplier_id: DbId,
    pub supplier_user_id: Option<DbId>,
    #[serde(default)]
    pub equipment_description: String,
    pub destination_address: String,
    pub scheduled_pickup_time: Option<Timestamp>,
}

/// DTO for a status transition request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDeliveryStatus {
    pub status: String,
    pub notes: Option<String>,
}

/// DTO for a location ping from the supplier's device.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: Option<f64>,
}
