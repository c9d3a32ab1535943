//! Event project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `event_projects` table.
///
/// The five `total_*` fields are derived; handlers never write them directly.
/// They change only through the recompute path (see `ProjectRepo::recompute_totals`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub project_number: String,
    pub status: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_company: Option<String>,
    pub client_cnpj: Option<String>,
    pub event_name: String,
    pub event_type: String,
    pub event_description: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub expected_attendance: Option<i32>,
    pub venue_name: Option<String>,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_state: String,
    pub venue_zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub budget_range: Option<String>,
    pub client_budget: Option<f64>,
    pub is_urgent: bool,
    pub additional_notes: Option<String>,
    pub profit_margin: f64,
    pub total_team_cost: f64,
    pub total_equipment_cost: f64,
    pub total_cost: f64,
    pub total_client_price: f64,
    pub total_profit: f64,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    pub client_company: Option<String>,
    pub client_cnpj: Option<String>,
    pub event_name: String,
    pub event_type: String,
    pub event_description: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub expected_attendance: Option<i32>,
    pub venue_name: Option<String>,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_state: String,
    pub venue_zip: Option<String>,
    pub budget_range: Option<String>,
    pub client_budget: Option<f64>,
    #[serde(default)]
    pub is_urgent: bool,
    pub additional_notes: Option<String>,
    /// Defaults to 30% when omitted.
    pub profit_margin: Option<f64>,
}

/// DTO for updating a project. Only status and margin are admin-mutable
/// after creation; a margin change triggers a recompute.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub status: Option<String>,
    pub profit_margin: Option<f64>,
    pub event_description: Option<String>,
    pub additional_notes: Option<String>,
}
