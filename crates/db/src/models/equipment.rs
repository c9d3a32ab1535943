//! Project equipment line model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `project_equipment` table.
///
/// `total_cost` is populated when a supplier quotation covering this line is
/// accepted; only lines with an `accepted_quotation_id` contribute to the
/// project's equipment cost rollup.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentItem {
    pub id: DbId,
    pub project_id: DbId,
    pub equipment_type: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub duration_days: i32,
    pub accepted_quotation_id: Option<DbId>,
    pub total_cost: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an equipment line to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentItem {
    pub equipment_type: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub duration_days: i32,
}
