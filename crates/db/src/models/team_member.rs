//! Project team (staffing line) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `project_team` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub project_id: DbId,
    pub professional_id: Option<DbId>,
    pub external_name: Option<String>,
    pub role: String,
    pub category: String,
    pub quantity: i32,
    pub daily_rate: f64,
    pub duration_days: i32,
    pub total_cost: f64,
    pub status: String,
    #[serde(skip_serializing)]
    pub invitation_token: Option<String>,
    pub token_expires_at: Option<Timestamp>,
    pub invited_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a staffing line to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamMember {
    pub professional_id: Option<DbId>,
    pub external_name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub category: String,
    pub quantity: i32,
    pub daily_rate: f64,
    pub duration_days: i32,
}

/// DTO for updating a staffing line. Rate/quantity/duration changes
/// re-derive the line total and the project rollup.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeamMember {
    pub role: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub daily_rate: Option<f64>,
    pub duration_days: Option<i32>,
}
