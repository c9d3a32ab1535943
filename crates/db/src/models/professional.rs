//! Professional entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hrx_core::types::{DbId, Timestamp};

/// A row from the `professionals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Professional {
    pub id: DbId,
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<String>,
    pub cep: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub categories: serde_json::Value,
    pub availability: serde_json::Value,
    pub has_experience: bool,
    pub years_of_experience: Option<String>,
    pub experience_description: Option<String>,
    pub service_radius_km: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a professional through the authenticated API.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfessional {
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub birth_date: Option<String>,
    #[serde(default)]
    pub cep: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub availability: serde_json::Value,
    #[serde(default)]
    pub has_experience: bool,
    pub years_of_experience: Option<String>,
    pub experience_description: Option<String>,
    pub service_radius_km: Option<i32>,
}
